//! Library layer for fundrank: filtering, enrichment, ranking, highlighting
//! and the xlsx report.
//!
//! Wraps the `fundrank_api` client behind the [`FundSource`] trait and drives
//! one run per [`PipelineConfig`]. The [`sheet`] module reads a finished
//! report back for paginated serving.

pub mod code;
pub mod config;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod highlight;
pub mod model;
pub mod pipeline;
pub mod rank;
pub mod report;
pub mod sheet;
pub mod source;
pub mod validation;

pub use fundrank_api;
pub use fundrank_api::types;
pub use fundrank_api::{Client, FundType};

pub use code::FundCode;
pub use config::PipelineConfig;
pub use enrich::{enrich_funds, EnrichObserver, EnrichOptions, EnrichOutcome};
pub use error::FundRankError;
pub use filter::{filter_catalog, FilterCriteria};
pub use highlight::{Emphasis, HighlightPlan, HighlightRules};
pub use model::{
    EnrichedFundRecord, FundCatalogEntry, FundCategoryResult, ReportColumn, ReturnColumn, Returns,
};
pub use pipeline::{process_category, run_pipeline, CategoryOutcome, CategoryReport, RunSummary};
pub use rank::rank_records;
pub use report::ReportWriter;
pub use sheet::{page_bounds, read_sheet, SheetTable};
pub use source::{FundSource, MarketDataSource};
