//! Data source adapter: the two upstream calls the pipeline depends on.

use fundrank_api::types::FundProfile;
use fundrank_api::{CatalogQuery, Client, FundType};

use crate::code::FundCode;
use crate::error::FundRankError;
use crate::model::FundCatalogEntry;

/// Item name of the inception date in a fund profile.
pub const INCEPTION_DATE_ITEM: &str = "成立时间";
/// Item name of the latest fund size in a fund profile.
pub const LATEST_SIZE_ITEM: &str = "最新规模";

/// Provider of the fund catalog and per-fund static attributes.
///
/// Calls are awaited one at a time by the pipeline; implementations need not
/// be safe for concurrent use.
#[allow(async_fn_in_trait)]
pub trait FundSource {
    /// Fetches every fund in one bulk call.
    async fn fetch_full_catalog(&self) -> Result<Vec<FundCatalogEntry>, FundRankError>;

    /// Fetches the static profile of one fund.
    async fn fetch_static_info(&self, code: &FundCode) -> Result<FundProfile, FundRankError>;
}

/// [`FundSource`] backed by the live market-data endpoints.
pub struct MarketDataSource {
    client: Client,
    fund_type: FundType,
}

impl MarketDataSource {
    pub fn new(client: Client, fund_type: FundType) -> Self {
        Self { client, fund_type }
    }
}

impl FundSource for MarketDataSource {
    async fn fetch_full_catalog(&self) -> Result<Vec<FundCatalogEntry>, FundRankError> {
        let query = CatalogQuery::default().with_fund_type(self.fund_type);
        let payload = self.client.get_catalog(&query).await?;
        if let Some(total) = payload.all_records {
            if total as usize != payload.rows.len() {
                tracing::warn!(
                    "Catalog reports {} funds but returned {}",
                    total,
                    payload.rows.len()
                );
            }
        }
        Ok(payload
            .rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| FundCatalogEntry::from_rank_row(idx as u32 + 1, row))
            .collect())
    }

    async fn fetch_static_info(&self, code: &FundCode) -> Result<FundProfile, FundRankError> {
        Ok(self.client.get_fund_profile(code.as_str()).await?)
    }
}
