use std::str::FromStr;

use chrono::Local;
use url::Url;

use super::{common::QueryCommon, Query};

/// Builder for the open-end fund ranking endpoint.
#[derive(Default, Debug)]
pub struct CatalogQuery {
    pub common: QueryCommon,
    pub fund_type: FundType,
    /// Upstream sort key. `None` uses the fund type's default.
    pub sort_by: Option<CatalogSortBy>,
}

impl Query for CatalogQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        let sort_by = self.sort_by.unwrap_or_else(|| self.fund_type.default_sort());
        url.query_pairs_mut()
            .append_pair("op", "ph")
            .append_pair("dt", "kf")
            .append_pair("ft", self.fund_type.as_param())
            .append_pair("rs", "")
            .append_pair("gs", "0")
            .append_pair("sc", sort_by.as_param());

        let mut url = self.common.add_to_url(&url, Local::now().date_naive());
        url.query_pairs_mut()
            .append_pair("qdii", "")
            .append_pair("tabSubtype", ",,,,,")
            .append_pair("dx", "1");
        url
    }
}

impl CatalogQuery {
    pub fn with_fund_type(mut self, fund_type: FundType) -> Self {
        self.fund_type = fund_type;
        self
    }

    pub fn with_sort_by(mut self, sort_by: CatalogSortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }
}

/// Fund type selector for the catalog. `All` returns every open-end fund.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FundType {
    #[default]
    All,
    Equity,
    Hybrid,
    Bond,
    Index,
    Qdii,
    Fof,
}
impl FundType {
    pub fn as_param(&self) -> &'static str {
        match self {
            FundType::All => "all",
            FundType::Equity => "gp",
            FundType::Hybrid => "hh",
            FundType::Bond => "zq",
            FundType::Index => "zs",
            FundType::Qdii => "qdii",
            FundType::Fof => "fof",
        }
    }

    /// Sort key the upstream ranking page uses for this fund type.
    pub fn default_sort(&self) -> CatalogSortBy {
        match self {
            FundType::All => CatalogSortBy::Week,
            _ => CatalogSortBy::SixMonths,
        }
    }
}
impl std::fmt::Display for FundType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FundType::All => "全部",
                FundType::Equity => "股票型",
                FundType::Hybrid => "混合型",
                FundType::Bond => "债券型",
                FundType::Index => "指数型",
                FundType::Qdii => "QDII",
                FundType::Fof => "FOF",
            }
        )?;
        Ok(())
    }
}
impl FromStr for FundType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "全部" | "all" => Ok(FundType::All),
            "股票型" | "equity" | "gp" => Ok(FundType::Equity),
            "混合型" | "hybrid" | "hh" => Ok(FundType::Hybrid),
            "债券型" | "bond" | "zq" => Ok(FundType::Bond),
            "指数型" | "index" | "zs" => Ok(FundType::Index),
            "QDII" | "qdii" => Ok(FundType::Qdii),
            "FOF" | "fof" => Ok(FundType::Fof),
            _ => Err(()),
        }
    }
}

/// Trailing-window column the upstream sorts by before paging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogSortBy {
    Week,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    YearToDate,
}
impl CatalogSortBy {
    pub fn as_param(&self) -> &'static str {
        match self {
            CatalogSortBy::Week => "zzf",
            CatalogSortBy::OneMonth => "1yzf",
            CatalogSortBy::ThreeMonths => "3yzf",
            CatalogSortBy::SixMonths => "6yzf",
            CatalogSortBy::OneYear => "1nzf",
            CatalogSortBy::YearToDate => "jnzf",
        }
    }
}
