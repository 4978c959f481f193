//! CLI subcommand implementations.

pub mod preview;
pub mod rank;
pub mod serve;

use anyhow::{anyhow, Result};
use clap::Args;
use fundrank_lib::{FundType, PipelineConfig, ReturnColumn};

/// Ranking options shared by `rank` and `preview`. Unset flags keep the
/// value from the environment or the built-in default.
#[derive(Args, Debug, Default)]
pub struct RankingArgs {
    /// Share-class marker the fund name must contain (e.g. C)
    #[arg(long)]
    pub share_class: Option<String>,

    /// Name keyword that excludes a fund; repeat or comma-separate
    #[arg(long = "exclude", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Keep no name exclusions at all
    #[arg(long, conflicts_with = "exclude")]
    pub no_exclude: bool,

    /// Ranking column: 1d, 1w, 1m, 3m, 6m, 1y, 2y, 3y, ytd, inception
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Size of each column's top set
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Top-set hits needed to emphasize a fund name
    #[arg(long)]
    pub hit_threshold: Option<usize>,

    /// Pause after each profile lookup, in milliseconds
    #[arg(long)]
    pub throttle_ms: Option<u64>,

    /// Also pause after failed profile lookups
    #[arg(long)]
    pub throttle_failures: bool,

    /// Catalog fund type: all, equity, hybrid, bond, index, qdii, fof
    #[arg(long)]
    pub fund_type: Option<String>,
}

impl RankingArgs {
    /// Layers the flags over `config`.
    pub fn apply(&self, mut config: PipelineConfig) -> Result<PipelineConfig> {
        if let Some(marker) = &self.share_class {
            config.share_class = marker.clone();
        }
        if self.no_exclude {
            config.denylist.clear();
        } else if !self.exclude.is_empty() {
            config.denylist = self.exclude.clone();
        }
        if let Some(column) = &self.sort_by {
            config.sort_column = column.parse::<ReturnColumn>().map_err(|e| anyhow!(e))?;
        }
        if let Some(n) = self.top_n {
            config.highlight.top_n = n;
        }
        if let Some(threshold) = self.hit_threshold {
            config.highlight.hit_threshold = threshold;
        }
        if let Some(ms) = self.throttle_ms {
            config.enrich.throttle = std::time::Duration::from_millis(ms);
        }
        if self.throttle_failures {
            config.enrich.throttle_failures = true;
        }
        if let Some(fund_type) = &self.fund_type {
            config.fund_type = fund_type.parse::<FundType>().map_err(|_| {
                anyhow!(
                    "unknown fund type '{}'. Valid values: all, equity, hybrid, bond, index, qdii, fof",
                    fund_type
                )
            })?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_args_keep_config() {
        let config = RankingArgs::default().apply(PipelineConfig::default()).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let args = RankingArgs {
            share_class: Some("A".to_string()),
            exclude: vec!["红利".to_string()],
            sort_by: Some("1y".to_string()),
            top_n: Some(3),
            throttle_ms: Some(0),
            fund_type: Some("index".to_string()),
            ..RankingArgs::default()
        };
        let config = args.apply(PipelineConfig::default()).unwrap();
        assert_eq!(config.share_class, "A");
        assert_eq!(config.denylist, vec!["红利"]);
        assert_eq!(config.sort_column, ReturnColumn::OneYear);
        assert_eq!(config.highlight.top_n, 3);
        assert_eq!(config.enrich.throttle, std::time::Duration::ZERO);
        assert_eq!(config.fund_type, FundType::Index);
    }

    #[test]
    fn test_no_exclude_clears_denylist() {
        let args = RankingArgs {
            no_exclude: true,
            ..RankingArgs::default()
        };
        assert!(args.apply(PipelineConfig::default()).unwrap().denylist.is_empty());
    }

    #[test]
    fn test_bad_sort_column_rejected() {
        let args = RankingArgs {
            sort_by: Some("5m".to_string()),
            ..RankingArgs::default()
        };
        assert!(args.apply(PipelineConfig::default()).is_err());
    }

    #[test]
    fn test_bad_fund_type_rejected() {
        let args = RankingArgs {
            fund_type: Some("crypto".to_string()),
            ..RankingArgs::default()
        };
        assert!(args.apply(PipelineConfig::default()).is_err());
    }
}
