//! `rank`: runs the whole pipeline and writes the highlighted workbook.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use fundrank_lib::{
    run_pipeline, Client, EnrichObserver, FundCode, MarketDataSource, PipelineConfig,
};
use indicatif::{ProgressBar, ProgressStyle};

use crate::commands::RankingArgs;
use crate::output::{
    print_json, print_summary_csv, print_summary_markdown, print_summary_table, OutputFormat,
};

#[derive(Args)]
pub struct RankArgs {
    /// Category substring, one sheet each; repeat or comma-separate
    #[arg(long = "category", value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Output workbook path
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub ranking: RankingArgs,
}

/// Progress bar per category while profiles are fetched.
#[derive(Default)]
struct ProgressObserver {
    bar: Option<ProgressBar>,
    ok: usize,
    failed: usize,
}

impl EnrichObserver for ProgressObserver {
    fn started(&mut self, category: &str, total: usize) {
        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} ({eta}) {msg}",
        ) {
            pb.set_style(style);
        }
        pb.set_message(format!("{}: fetching fund profiles...", category));
        self.bar = Some(pb);
        self.ok = 0;
        self.failed = 0;
    }

    fn fund_done(&mut self, code: &FundCode, ok: bool) {
        if ok {
            self.ok += 1;
        } else {
            self.failed += 1;
        }
        if let Some(pb) = &self.bar {
            pb.set_message(format!("{} {} ok, {} err", code, self.ok, self.failed));
            pb.inc(1);
        }
    }

    fn finished(&mut self, category: &str, failures: usize) {
        if let Some(pb) = self.bar.take() {
            pb.finish_with_message(format!(
                "{} done: {} enriched, {} failed",
                category, self.ok, failures
            ));
        }
    }
}

pub async fn run(args: &RankArgs, format: &OutputFormat) -> Result<()> {
    let mut config = args.ranking.apply(PipelineConfig::from_env())?;
    if !args.categories.is_empty() {
        config.categories = args.categories.clone();
    }
    if let Some(out) = &args.out {
        config.output = out.clone();
    }
    let config = config.validate()?;

    let source = MarketDataSource::new(Client::new(), config.fund_type);
    let mut progress = ProgressObserver::default();
    let summary = run_pipeline(&source, &config, &mut progress).await?;

    match format {
        OutputFormat::Table => print_summary_table(&summary),
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Csv => print_summary_csv(&summary)?,
        OutputFormat::Markdown => print_summary_markdown(&summary),
    }

    match &summary.output {
        Some(path) => eprintln!(
            "Ranking complete: {} sheets saved to {}",
            summary.sheets_written(),
            path.display()
        ),
        None => eprintln!("No category matched any fund; no workbook written"),
    }
    Ok(())
}
