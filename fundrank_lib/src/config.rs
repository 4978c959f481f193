//! Run configuration: categories, filter keywords, highlight rules, pacing.
//!
//! Defaults reproduce the stock report. `FUNDRANK_*` environment variables
//! override them; values that fail to parse fall back to the default.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use fundrank_api::FundType;

use crate::enrich::EnrichOptions;
use crate::error::FundRankError;
use crate::filter::FilterCriteria;
use crate::highlight::HighlightRules;
use crate::model::ReturnColumn;
use crate::validation;

pub const DEFAULT_CATEGORIES: &[&str] = &["沪深300", "中证500", "中证1000", "中证2000"];
pub const DEFAULT_SHARE_CLASS: &str = "C";
pub const DEFAULT_DENYLIST: &[&str] = &["红利", "基本面", "价值", "非银", "成长", "低波动"];
pub const DEFAULT_OUTPUT: &str = "所有基金C份额收益率排名.xlsx";
pub const DEFAULT_THROTTLE_MS: u64 = 100;

#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Category substrings, processed in this order, one sheet each.
    pub categories: Vec<String>,
    pub share_class: String,
    pub denylist: Vec<String>,
    /// Column the ranking sorts on.
    pub sort_column: ReturnColumn,
    pub highlight: HighlightRules,
    pub enrich: EnrichOptions,
    pub fund_type: FundType,
    pub output: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            share_class: DEFAULT_SHARE_CLASS.to_string(),
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            sort_column: ReturnColumn::SixMonths,
            highlight: HighlightRules::default(),
            enrich: EnrichOptions {
                throttle: Duration::from_millis(DEFAULT_THROTTLE_MS),
                throttle_failures: false,
            },
            fund_type: FundType::All,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `FUNDRANK_*` key.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(list) = lookup("FUNDRANK_CATEGORIES") {
            config.categories = split_list(&list);
        }
        if let Some(marker) = lookup("FUNDRANK_SHARE_CLASS") {
            config.share_class = marker;
        }
        if let Some(list) = lookup("FUNDRANK_DENYLIST") {
            config.denylist = split_list(&list);
        }
        if let Some(column) = parsed(&lookup, "FUNDRANK_SORT_COLUMN", |v| v.parse().ok()) {
            config.sort_column = column;
        }
        if let Some(n) = parsed(&lookup, "FUNDRANK_TOP_N", |v| v.parse().ok()) {
            config.highlight.top_n = n;
        }
        if let Some(t) = parsed(&lookup, "FUNDRANK_HIT_THRESHOLD", |v| v.parse().ok()) {
            config.highlight.hit_threshold = t;
        }
        if let Some(ms) = parsed(&lookup, "FUNDRANK_THROTTLE_MS", |v| v.parse::<u64>().ok()) {
            config.enrich.throttle = Duration::from_millis(ms);
        }
        if let Some(flag) = parsed(&lookup, "FUNDRANK_THROTTLE_FAILURES", parse_flag) {
            config.enrich.throttle_failures = flag;
        }
        if let Some(fund_type) = parsed(&lookup, "FUNDRANK_FUND_TYPE", |v| v.parse().ok()) {
            config.fund_type = fund_type;
        }
        if let Some(path) = lookup("FUNDRANK_OUTPUT") {
            config.output = PathBuf::from(path);
        }
        config
    }

    /// Checks and normalizes every field, failing on the first bad one.
    pub fn validate(mut self) -> Result<Self, FundRankError> {
        if self.categories.is_empty() {
            return Err(FundRankError::InvalidInput(
                "at least one category is required".to_string(),
            ));
        }
        self.categories = self
            .categories
            .iter()
            .map(|c| validation::validate_category(c))
            .collect::<Result<_, _>>()?;
        // Each category names a sheet; workbook sheet names must be unique.
        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.to_lowercase()) {
                return Err(FundRankError::InvalidInput(format!(
                    "category '{}' is listed more than once",
                    category
                )));
            }
        }
        self.share_class = validation::validate_share_class(&self.share_class)?;
        self.denylist = validation::validate_denylist(&self.denylist)?;
        if self.highlight.columns.is_empty() {
            return Err(FundRankError::InvalidInput(
                "at least one highlight column is required".to_string(),
            ));
        }
        validation::validate_top_n(self.highlight.top_n)?;
        validation::validate_hit_threshold(
            self.highlight.hit_threshold,
            self.highlight.columns.len(),
        )?;
        Ok(self)
    }

    /// Filter criteria for one category under this configuration.
    pub fn criteria_for(&self, category: &str) -> FilterCriteria {
        FilterCriteria {
            category: category.to_string(),
            share_class: self.share_class.clone(),
            denylist: self.denylist.clone(),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parsed<F, T, P>(lookup: &F, key: &str, parse: P) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
{
    let raw = lookup(key)?;
    let value = parse(raw.trim());
    if value.is_none() {
        tracing::warn!("Ignoring {}={:?}: not a valid value", key, raw);
    }
    value
}
