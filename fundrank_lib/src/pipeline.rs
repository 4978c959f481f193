//! End-to-end run: catalog, then per category filter, enrich, rank, highlight
//! and write, then column widths and save.

use std::path::PathBuf;

use serde::Serialize;

use crate::code::FundCode;
use crate::config::PipelineConfig;
use crate::enrich::{enrich_funds, EnrichObserver};
use crate::error::FundRankError;
use crate::filter::filter_catalog;
use crate::highlight::HighlightPlan;
use crate::model::{EnrichedFundRecord, FundCatalogEntry, FundCategoryResult};
use crate::report::ReportWriter;
use crate::source::FundSource;

/// One ranked category together with its highlight plan.
#[derive(Debug)]
pub struct CategoryReport {
    pub result: FundCategoryResult,
    pub plan: HighlightPlan,
    /// Funds whose profile lookup failed. Empty when enrichment was skipped.
    pub failures: Vec<FundCode>,
}

impl CategoryReport {
    /// Names of funds whose name cell is strongly emphasized, in rank order.
    pub fn strong_funds(&self) -> Vec<String> {
        self.plan
            .strong_rows()
            .into_iter()
            .filter_map(|row| self.result.records.get(row))
            .map(|r| r.name().unwrap_or_else(|| r.code().as_str()).to_string())
            .collect()
    }
}

/// What happened to one category during a run.
#[derive(Clone, Debug, Serialize)]
pub struct CategoryOutcome {
    pub category: String,
    pub sheet_name: String,
    /// Funds that passed the filter.
    pub matched: usize,
    pub enrichment_failures: Vec<FundCode>,
    pub sheet_written: bool,
    pub strong_funds: Vec<String>,
}

/// Result of a full run.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub catalog_size: usize,
    pub categories: Vec<CategoryOutcome>,
    /// Path of the saved workbook, `None` when every category was empty.
    pub output: Option<PathBuf>,
}

impl RunSummary {
    pub fn sheets_written(&self) -> usize {
        self.categories.iter().filter(|c| c.sheet_written).count()
    }
}

/// Filters, optionally enriches, and ranks one category of an already
/// fetched catalog.
///
/// An empty category makes no profile lookups.
pub async fn process_category<S, O>(
    source: &S,
    catalog: &[FundCatalogEntry],
    config: &PipelineConfig,
    category: &str,
    enrich: bool,
    observer: &mut O,
) -> CategoryReport
where
    S: FundSource,
    O: EnrichObserver + ?Sized,
{
    let matched = filter_catalog(catalog, &config.criteria_for(category));
    tracing::info!("{}: {} funds match", category, matched.len());

    let (records, failures) = if enrich && !matched.is_empty() {
        let outcome = enrich_funds(source, category, matched, &config.enrich, observer).await;
        (outcome.records, outcome.failures)
    } else {
        let records: Vec<EnrichedFundRecord> =
            matched.into_iter().map(EnrichedFundRecord::blank).collect();
        (records, Vec::new())
    };

    let result =
        FundCategoryResult::ranked(category, &config.share_class, records, config.sort_column);
    let plan = HighlightPlan::for_records(&result.records, &config.highlight);
    CategoryReport {
        result,
        plan,
        failures,
    }
}

/// Runs every configured category and writes the workbook.
///
/// A failed catalog fetch aborts before anything is written. Per-fund lookup
/// failures only blank that fund's enrichment fields. When every category is
/// empty no file is produced and `output` is `None`.
pub async fn run_pipeline<S, O>(
    source: &S,
    config: &PipelineConfig,
    observer: &mut O,
) -> Result<RunSummary, FundRankError>
where
    S: FundSource,
    O: EnrichObserver + ?Sized,
{
    let catalog = source.fetch_full_catalog().await?;
    tracing::info!("Fetched {} funds from the catalog", catalog.len());

    let mut writer = ReportWriter::new();
    let mut outcomes = Vec::with_capacity(config.categories.len());

    for category in &config.categories {
        let report = process_category(source, &catalog, config, category, true, observer).await;
        let sheet_written = writer.add_category(&report.result, &report.plan)?;
        outcomes.push(CategoryOutcome {
            category: category.clone(),
            sheet_name: report.result.sheet_name(),
            matched: report.result.records.len(),
            enrichment_failures: report.failures.clone(),
            sheet_written,
            strong_funds: report.strong_funds(),
        });
    }

    let saved = writer.finish(&config.output)?;
    Ok(RunSummary {
        catalog_size: catalog.len(),
        categories: outcomes,
        output: saved.then(|| config.output.clone()),
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use fundrank_api::types::FundProfile;

    use super::*;
    use crate::model::{ReturnColumn, Returns};

    struct StaticSource {
        catalog: Result<Vec<FundCatalogEntry>, ()>,
        lookups: RefCell<usize>,
    }

    impl FundSource for StaticSource {
        async fn fetch_full_catalog(&self) -> Result<Vec<FundCatalogEntry>, FundRankError> {
            self.catalog
                .clone()
                .map_err(|_| FundRankError::Api(fundrank_api::Error::RequestFailed))
        }

        async fn fetch_static_info(&self, _code: &FundCode) -> Result<FundProfile, FundRankError> {
            *self.lookups.borrow_mut() += 1;
            Ok(serde_json::from_value(serde_json::json!({"found_date": "2020-02-02"})).unwrap())
        }
    }

    fn entry(seq: u32, name: &str, six_months: f64) -> FundCatalogEntry {
        let mut returns = Returns::default();
        returns.set(ReturnColumn::SixMonths, Some(six_months));
        FundCatalogEntry {
            seq,
            code: FundCode::from_integer(seq as i64),
            name: Some(name.to_string()),
            nav_date: None,
            unit_nav: None,
            accum_nav: None,
            returns,
            fee: None,
        }
    }

    fn config(output: PathBuf) -> PipelineConfig {
        let mut config = PipelineConfig {
            categories: vec!["沪深300".to_string(), "中证2000".to_string()],
            output,
            ..PipelineConfig::default()
        };
        config.enrich.throttle = std::time::Duration::ZERO;
        config
    }

    #[tokio::test]
    async fn catalog_failure_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let source = StaticSource {
            catalog: Err(()),
            lookups: RefCell::new(0),
        };
        let result = run_pipeline(&source, &config(path.clone()), &mut ()).await;
        assert!(matches!(result, Err(FundRankError::Api(_))));
        assert!(!path.exists());
        assert_eq!(*source.lookups.borrow(), 0);
    }

    #[tokio::test]
    async fn empty_category_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let source = StaticSource {
            catalog: Ok(vec![
                entry(1, "沪深300指数C", 1.0),
                entry(2, "沪深300红利C", 9.0),
                entry(3, "沪深300增强C", 5.0),
            ]),
            lookups: RefCell::new(0),
        };
        let summary = run_pipeline(&source, &config(path.clone()), &mut ()).await.unwrap();

        assert_eq!(summary.catalog_size, 3);
        assert_eq!(summary.sheets_written(), 1);
        assert_eq!(summary.output.as_deref(), Some(path.as_path()));
        assert_eq!(summary.categories[0].matched, 2);
        assert!(summary.categories[0].sheet_written);
        assert_eq!(summary.categories[1].matched, 0);
        assert!(!summary.categories[1].sheet_written);
        assert_eq!(*source.lookups.borrow(), 2);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn all_empty_run_produces_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let source = StaticSource {
            catalog: Ok(vec![entry(1, "创业板C", 1.0)]),
            lookups: RefCell::new(0),
        };
        let summary = run_pipeline(&source, &config(path.clone()), &mut ()).await.unwrap();
        assert_eq!(summary.sheets_written(), 0);
        assert_eq!(summary.output, None);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn process_category_without_enrichment_ranks_only() {
        let source = StaticSource {
            catalog: Ok(Vec::new()),
            lookups: RefCell::new(0),
        };
        let catalog = vec![entry(1, "沪深300指数C", 1.0), entry(2, "沪深300增强C", 5.0)];
        let report = process_category(
            &source,
            &catalog,
            &config(PathBuf::from("unused.xlsx")),
            "沪深300",
            false,
            &mut (),
        )
        .await;
        assert_eq!(*source.lookups.borrow(), 0);
        let codes: Vec<&str> = report.result.records.iter().map(|r| r.code().as_str()).collect();
        assert_eq!(codes, vec!["000002", "000001"]);
        assert!(report.result.records.iter().all(|r| r.inception_date.is_none()));
        assert!(report.failures.is_empty());
    }
}
