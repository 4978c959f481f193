use anyhow::Result;
use fundrank_lib::{CategoryReport, Emphasis, ReturnColumn, RunSummary};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "md" | "markdown" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct FundRow {
    #[tabled(rename = "#")]
    #[serde(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "1M %")]
    #[serde(rename = "1M %")]
    one_month: String,
    #[tabled(rename = "3M %")]
    #[serde(rename = "3M %")]
    three_months: String,
    #[tabled(rename = "6M %")]
    #[serde(rename = "6M %")]
    six_months: String,
    #[tabled(rename = "1Y %")]
    #[serde(rename = "1Y %")]
    one_year: String,
    #[tabled(rename = "YTD %")]
    #[serde(rename = "YTD %")]
    year_to_date: String,
    #[tabled(rename = "Hits")]
    #[serde(rename = "Hits")]
    hits: String,
    #[tabled(rename = "Founded")]
    #[serde(rename = "Founded")]
    inception_date: String,
    #[tabled(rename = "Size")]
    #[serde(rename = "Size")]
    latest_size: String,
}

#[derive(Tabled, Serialize)]
struct SummaryRow {
    #[tabled(rename = "Category")]
    #[serde(rename = "Category")]
    category: String,
    #[tabled(rename = "Sheet")]
    #[serde(rename = "Sheet")]
    sheet: String,
    #[tabled(rename = "Funds")]
    #[serde(rename = "Funds")]
    matched: usize,
    #[tabled(rename = "Failed lookups")]
    #[serde(rename = "Failed lookups")]
    failures: usize,
    #[tabled(rename = "Strong")]
    #[serde(rename = "Strong")]
    strong: String,
}

fn build_fund_rows(report: &CategoryReport, limit: Option<usize>) -> Vec<FundRow> {
    let records = &report.result.records;
    let shown = limit.unwrap_or(records.len()).min(records.len());
    records[..shown]
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let hits = report.plan.hit_count(idx);
            let strong = report.plan.name_emphasis(idx) == Emphasis::Strong;
            FundRow {
                rank: idx + 1,
                code: record.code().to_string(),
                name: record.name().unwrap_or("-").to_string(),
                one_month: format_return(record.return_of(ReturnColumn::OneMonth)),
                three_months: format_return(record.return_of(ReturnColumn::ThreeMonths)),
                six_months: format_return(record.return_of(ReturnColumn::SixMonths)),
                one_year: format_return(record.return_of(ReturnColumn::OneYear)),
                year_to_date: format_return(record.return_of(ReturnColumn::YearToDate)),
                hits: if strong {
                    format!("{}*", hits)
                } else {
                    hits.to_string()
                },
                inception_date: record.inception_date.clone().unwrap_or_else(|| "-".to_string()),
                latest_size: record.latest_size.clone().unwrap_or_else(|| "-".to_string()),
            }
        })
        .collect()
}

fn build_summary_rows(summary: &RunSummary) -> Vec<SummaryRow> {
    summary
        .categories
        .iter()
        .map(|c| SummaryRow {
            category: c.category.clone(),
            sheet: if c.sheet_written {
                c.sheet_name.clone()
            } else {
                "-".to_string()
            },
            matched: c.matched,
            failures: c.enrichment_failures.len(),
            strong: c.strong_funds.join(", "),
        })
        .collect()
}

// -- Fund tables --

pub fn print_funds_table(report: &CategoryReport, limit: Option<usize>) {
    println!("{}", Table::new(build_fund_rows(report, limit)));
}

pub fn print_funds_markdown(report: &CategoryReport, limit: Option<usize>) {
    let mut table = Table::new(build_fund_rows(report, limit));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_funds_csv(report: &CategoryReport, limit: Option<usize>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_fund_rows(report, limit) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_funds_json(report: &CategoryReport, limit: Option<usize>) {
    print_json(&build_fund_rows(report, limit));
}

// -- Run summary --

pub fn print_summary_table(summary: &RunSummary) {
    println!("{}", Table::new(build_summary_rows(summary)));
}

pub fn print_summary_markdown(summary: &RunSummary) {
    let mut table = Table::new(build_summary_rows(summary));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_summary_csv(summary: &RunSummary) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_summary_rows(summary) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_return(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}
