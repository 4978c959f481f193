//! Per-fund enrichment with inception date and latest size.
//!
//! Lookups run strictly one after another. A successful lookup is followed by
//! a fixed pause so the profile service is not hammered; a failed lookup is
//! logged with its fund code and leaves that fund's fields blank.

use std::time::Duration;

use tokio::time::sleep;

use crate::code::FundCode;
use crate::model::{EnrichedFundRecord, FundCatalogEntry};
use crate::source::{FundSource, INCEPTION_DATE_ITEM, LATEST_SIZE_ITEM};

/// Pacing of profile lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnrichOptions {
    /// Pause after each successful lookup.
    pub throttle: Duration,
    /// Also pause after failed lookups.
    pub throttle_failures: bool,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            throttle: Duration::from_millis(100),
            throttle_failures: false,
        }
    }
}

/// Receives progress notifications while a category is enriched.
pub trait EnrichObserver {
    fn started(&mut self, _category: &str, _total: usize) {}
    fn fund_done(&mut self, _code: &FundCode, _ok: bool) {}
    fn finished(&mut self, _category: &str, _failures: usize) {}
}

impl EnrichObserver for () {}

/// Records produced by enrichment, plus the codes whose lookup failed.
#[derive(Debug)]
pub struct EnrichOutcome {
    /// Same length and order as the input.
    pub records: Vec<EnrichedFundRecord>,
    pub failures: Vec<FundCode>,
}

/// Enriches `entries` in order, one lookup at a time.
///
/// Never drops or reorders rows: a failed lookup yields a record with both
/// enrichment fields blank.
pub async fn enrich_funds<S, O>(
    source: &S,
    category: &str,
    entries: Vec<FundCatalogEntry>,
    options: &EnrichOptions,
    observer: &mut O,
) -> EnrichOutcome
where
    S: FundSource,
    O: EnrichObserver + ?Sized,
{
    observer.started(category, entries.len());
    let mut records = Vec::with_capacity(entries.len());
    let mut failures = Vec::new();

    for entry in entries {
        let mut record = EnrichedFundRecord::blank(entry);
        match source.fetch_static_info(record.code()).await {
            Ok(profile) => {
                if let Some(date) = profile.item(INCEPTION_DATE_ITEM) {
                    record.inception_date = Some(date);
                }
                if let Some(size) = profile.item(LATEST_SIZE_ITEM) {
                    record.latest_size = Some(size);
                }
                observer.fund_done(record.code(), true);
                sleep(options.throttle).await;
            }
            Err(err) => {
                tracing::warn!("Profile lookup for fund {} failed: {}", record.code(), err);
                observer.fund_done(record.code(), false);
                failures.push(record.code().clone());
                if options.throttle_failures {
                    sleep(options.throttle).await;
                }
            }
        }
        records.push(record);
    }

    observer.finished(category, failures.len());
    tracing::info!(
        "Enriched {} funds for {} ({} lookups failed)",
        records.len(),
        category,
        failures.len()
    );
    EnrichOutcome { records, failures }
}
