//! `preview`: ranks one category in the terminal without writing a workbook.

use anyhow::Result;
use clap::Args;
use fundrank_lib::{process_category, Client, FundSource, MarketDataSource, PipelineConfig};
use fundrank_lib::validation;

use crate::commands::RankingArgs;
use crate::output::{
    print_funds_csv, print_funds_json, print_funds_markdown, print_funds_table, OutputFormat,
};

#[derive(Args)]
pub struct PreviewArgs {
    /// Category substring to rank
    #[arg(long, default_value = "沪深300")]
    pub category: String,

    /// Fetch inception date and size for every matched fund (one request each)
    #[arg(long)]
    pub enrich: bool,

    /// Show only the first N funds
    #[arg(long)]
    pub top: Option<usize>,

    #[command(flatten)]
    pub ranking: RankingArgs,
}

pub async fn run(args: &PreviewArgs, format: &OutputFormat) -> Result<()> {
    let category = validation::validate_category(&args.category)?;
    let mut config = args.ranking.apply(PipelineConfig::from_env())?;
    config.categories = vec![category.clone()];
    let config = config.validate()?;

    let source = MarketDataSource::new(Client::new(), config.fund_type);
    let catalog = source.fetch_full_catalog().await?;
    let report = process_category(&source, &catalog, &config, &category, args.enrich, &mut ()).await;

    if report.result.is_empty() {
        eprintln!("No fund matches category '{}'", category);
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_funds_table(&report, args.top),
        OutputFormat::Json => print_funds_json(&report, args.top),
        OutputFormat::Csv => print_funds_csv(&report, args.top)?,
        OutputFormat::Markdown => print_funds_markdown(&report, args.top),
    }

    if !report.failures.is_empty() {
        eprintln!("{} profile lookups failed", report.failures.len());
    }
    Ok(())
}
