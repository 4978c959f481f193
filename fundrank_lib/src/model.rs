//! Fund records as they move through the pipeline.

use std::str::FromStr;

use chrono::NaiveDate;
use fundrank_api::types::RankRow;
use serde::{Deserialize, Serialize};

use crate::code::FundCode;

/// Trailing-window performance columns published in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReturnColumn {
    Daily,
    Week,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    ThreeYears,
    YearToDate,
    SinceInception,
}

impl ReturnColumn {
    /// Every column, in catalog order.
    pub const ALL: [ReturnColumn; 10] = [
        ReturnColumn::Daily,
        ReturnColumn::Week,
        ReturnColumn::OneMonth,
        ReturnColumn::ThreeMonths,
        ReturnColumn::SixMonths,
        ReturnColumn::OneYear,
        ReturnColumn::TwoYears,
        ReturnColumn::ThreeYears,
        ReturnColumn::YearToDate,
        ReturnColumn::SinceInception,
    ];

    /// Header text used in the catalog and the report.
    pub fn label(&self) -> &'static str {
        match self {
            ReturnColumn::Daily => "日增长率",
            ReturnColumn::Week => "近1周",
            ReturnColumn::OneMonth => "近1月",
            ReturnColumn::ThreeMonths => "近3月",
            ReturnColumn::SixMonths => "近6月",
            ReturnColumn::OneYear => "近1年",
            ReturnColumn::TwoYears => "近2年",
            ReturnColumn::ThreeYears => "近3年",
            ReturnColumn::YearToDate => "今年来",
            ReturnColumn::SinceInception => "成立来",
        }
    }

    /// Short ASCII name accepted on the command line.
    pub fn slug(&self) -> &'static str {
        match self {
            ReturnColumn::Daily => "1d",
            ReturnColumn::Week => "1w",
            ReturnColumn::OneMonth => "1m",
            ReturnColumn::ThreeMonths => "3m",
            ReturnColumn::SixMonths => "6m",
            ReturnColumn::OneYear => "1y",
            ReturnColumn::TwoYears => "2y",
            ReturnColumn::ThreeYears => "3y",
            ReturnColumn::YearToDate => "ytd",
            ReturnColumn::SinceInception => "inception",
        }
    }
}

impl std::fmt::Display for ReturnColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReturnColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ReturnColumn::ALL
            .into_iter()
            .find(|c| c.label() == s || c.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let valid: Vec<&str> = ReturnColumn::ALL.iter().map(|c| c.slug()).collect();
                format!("unknown return column '{}'. Valid values: {}", s, valid.join(", "))
            })
    }
}

/// Trailing returns of one fund, in percent. `None` when upstream publishes no figure.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Returns {
    pub daily: Option<f64>,
    pub week: Option<f64>,
    pub one_month: Option<f64>,
    pub three_months: Option<f64>,
    pub six_months: Option<f64>,
    pub one_year: Option<f64>,
    pub two_years: Option<f64>,
    pub three_years: Option<f64>,
    pub year_to_date: Option<f64>,
    pub since_inception: Option<f64>,
}

impl Returns {
    pub fn get(&self, column: ReturnColumn) -> Option<f64> {
        match column {
            ReturnColumn::Daily => self.daily,
            ReturnColumn::Week => self.week,
            ReturnColumn::OneMonth => self.one_month,
            ReturnColumn::ThreeMonths => self.three_months,
            ReturnColumn::SixMonths => self.six_months,
            ReturnColumn::OneYear => self.one_year,
            ReturnColumn::TwoYears => self.two_years,
            ReturnColumn::ThreeYears => self.three_years,
            ReturnColumn::YearToDate => self.year_to_date,
            ReturnColumn::SinceInception => self.since_inception,
        }
    }

    pub fn set(&mut self, column: ReturnColumn, value: Option<f64>) {
        let slot = match column {
            ReturnColumn::Daily => &mut self.daily,
            ReturnColumn::Week => &mut self.week,
            ReturnColumn::OneMonth => &mut self.one_month,
            ReturnColumn::ThreeMonths => &mut self.three_months,
            ReturnColumn::SixMonths => &mut self.six_months,
            ReturnColumn::OneYear => &mut self.one_year,
            ReturnColumn::TwoYears => &mut self.two_years,
            ReturnColumn::ThreeYears => &mut self.three_years,
            ReturnColumn::YearToDate => &mut self.year_to_date,
            ReturnColumn::SinceInception => &mut self.since_inception,
        };
        *slot = value;
    }
}

/// One fund as published in the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FundCatalogEntry {
    /// 1-based position in the full catalog.
    pub seq: u32,
    pub code: FundCode,
    pub name: Option<String>,
    pub nav_date: Option<NaiveDate>,
    pub unit_nav: Option<f64>,
    pub accum_nav: Option<f64>,
    pub returns: Returns,
    pub fee: Option<String>,
}

impl FundCatalogEntry {
    /// Builds an entry from a decoded catalog line.
    pub fn from_rank_row(seq: u32, row: RankRow) -> Self {
        Self {
            seq,
            code: FundCode::from_text(&row.code),
            name: row.name,
            nav_date: row.nav_date,
            unit_nav: row.unit_nav,
            accum_nav: row.accum_nav,
            returns: Returns {
                daily: row.daily_growth,
                week: row.week,
                one_month: row.month1,
                three_months: row.month3,
                six_months: row.month6,
                one_year: row.year1,
                two_years: row.year2,
                three_years: row.year3,
                year_to_date: row.ytd,
                since_inception: row.since_inception,
            },
            fee: row.fee,
        }
    }

    pub fn return_of(&self, column: ReturnColumn) -> Option<f64> {
        self.returns.get(column)
    }
}

/// A catalog entry plus the attributes fetched per fund during enrichment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrichedFundRecord {
    #[serde(flatten)]
    pub entry: FundCatalogEntry,
    pub inception_date: Option<String>,
    pub latest_size: Option<String>,
}

impl EnrichedFundRecord {
    /// Wraps an entry with both enrichment fields blank.
    pub fn blank(entry: FundCatalogEntry) -> Self {
        Self {
            entry,
            inception_date: None,
            latest_size: None,
        }
    }

    pub fn code(&self) -> &FundCode {
        &self.entry.code
    }

    pub fn name(&self) -> Option<&str> {
        self.entry.name.as_deref()
    }

    pub fn return_of(&self, column: ReturnColumn) -> Option<f64> {
        self.entry.return_of(column)
    }
}

/// Ranked funds of one category and share class.
#[derive(Clone, Debug)]
pub struct FundCategoryResult {
    pub category: String,
    pub share_class: String,
    pub sort_column: ReturnColumn,
    pub records: Vec<EnrichedFundRecord>,
}

impl FundCategoryResult {
    /// Name of the sheet this category is written to.
    pub fn sheet_name(&self) -> String {
        sheet_name_for(&self.category)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Sheet name for a category: the category followed by `基金`.
pub fn sheet_name_for(category: &str) -> String {
    format!("{}基金", category)
}

/// Columns of a rendered report, in sheet order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportColumn {
    Seq,
    Code,
    Name,
    NavDate,
    UnitNav,
    AccumNav,
    Return(ReturnColumn),
    Fee,
    InceptionDate,
    LatestSize,
}

impl ReportColumn {
    /// Full report layout: catalog columns followed by the enrichment columns.
    pub fn layout() -> Vec<ReportColumn> {
        let mut columns = vec![
            ReportColumn::Seq,
            ReportColumn::Code,
            ReportColumn::Name,
            ReportColumn::NavDate,
            ReportColumn::UnitNav,
            ReportColumn::AccumNav,
        ];
        columns.extend(ReturnColumn::ALL.into_iter().map(ReportColumn::Return));
        columns.extend([
            ReportColumn::Fee,
            ReportColumn::InceptionDate,
            ReportColumn::LatestSize,
        ]);
        columns
    }

    pub fn header(&self) -> &'static str {
        match self {
            ReportColumn::Seq => "序号",
            ReportColumn::Code => "基金代码",
            ReportColumn::Name => "基金简称",
            ReportColumn::NavDate => "日期",
            ReportColumn::UnitNav => "单位净值",
            ReportColumn::AccumNav => "累计净值",
            ReportColumn::Return(column) => column.label(),
            ReportColumn::Fee => "手续费",
            ReportColumn::InceptionDate => "成立时间",
            ReportColumn::LatestSize => "最新规模",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank_row() -> RankRow {
        RankRow {
            code: "300".to_string(),
            name: Some("沪深300ETF联接C".to_string()),
            nav_date: NaiveDate::from_ymd_opt(2025, 9, 24),
            unit_nav: Some(1.2),
            accum_nav: Some(1.5),
            daily_growth: Some(0.5),
            week: Some(1.0),
            month1: Some(2.0),
            month3: Some(3.0),
            month6: Some(6.0),
            year1: Some(12.0),
            year2: None,
            year3: None,
            ytd: Some(9.0),
            since_inception: Some(50.0),
            fee: None,
        }
    }

    #[test]
    fn entry_from_rank_row_pads_code() {
        let entry = FundCatalogEntry::from_rank_row(7, rank_row());
        assert_eq!(entry.seq, 7);
        assert_eq!(entry.code.as_str(), "000300");
        assert_eq!(entry.return_of(ReturnColumn::SixMonths), Some(6.0));
        assert_eq!(entry.return_of(ReturnColumn::TwoYears), None);
    }

    #[test]
    fn return_column_parses_slug_and_label() {
        assert_eq!("6m".parse::<ReturnColumn>(), Ok(ReturnColumn::SixMonths));
        assert_eq!("近6月".parse::<ReturnColumn>(), Ok(ReturnColumn::SixMonths));
        assert_eq!("YTD".parse::<ReturnColumn>(), Ok(ReturnColumn::YearToDate));
        assert!("5m".parse::<ReturnColumn>().is_err());
    }

    #[test]
    fn returns_set_and_get_agree() {
        let mut returns = Returns::default();
        for (i, column) in ReturnColumn::ALL.into_iter().enumerate() {
            returns.set(column, Some(i as f64));
        }
        for (i, column) in ReturnColumn::ALL.into_iter().enumerate() {
            assert_eq!(returns.get(column), Some(i as f64));
        }
    }

    #[test]
    fn layout_appends_enrichment_columns() {
        let headers: Vec<&str> = ReportColumn::layout().iter().map(|c| c.header()).collect();
        assert_eq!(headers.len(), 19);
        assert_eq!(headers[0], "序号");
        assert_eq!(headers[2], "基金简称");
        assert_eq!(headers[6], "日增长率");
        assert_eq!(&headers[16..], &["手续费", "成立时间", "最新规模"]);
    }

    #[test]
    fn sheet_name_appends_suffix() {
        assert_eq!(sheet_name_for("沪深300"), "沪深300基金");
    }
}
