//! HTTP client for the fund ranking and fund profile endpoints.

use std::time::Duration;

use reqwest::header::{ACCEPT, REFERER, USER_AGENT};
use url::Url;

use crate::{
    query::{CatalogQuery, Query},
    types::{FundProfile, ProfileResponse, RankPayload},
    user_agent::get_user_agent,
    Error,
};

/// Per-request timeout. A stalled upstream call fails instead of hanging the run.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the two upstream data sources.
///
/// The catalog comes from the fund ranking handler; per-fund profiles come
/// from the fund detail API. Every request carries a randomized browser user
/// agent and is bounded by a 30-second timeout.
pub struct Client {
    http: reqwest::Client,
    /// Base URL for the ranking handler. Defaults to `https://fund.eastmoney.com`.
    catalog_base_url: String,
    /// Base URL for fund profiles. Defaults to `https://danjuanfunds.com`.
    profile_base_url: String,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production endpoints.
    pub fn new() -> Self {
        Self::with_base_urls("https://fund.eastmoney.com", "https://danjuanfunds.com")
    }

    /// Creates a new client with a single custom base URL for both sources. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_base_urls(base_url, base_url)
    }

    /// Creates a new client with separate base URLs for the catalog and profile sources.
    pub fn with_base_urls(catalog_base_url: &str, profile_base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build HTTP client, using defaults: {}", e);
                reqwest::Client::new()
            });
        Self {
            http,
            catalog_base_url: catalog_base_url.trim_end_matches('/').to_string(),
            profile_base_url: profile_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_url(base: &str, path: &str) -> Result<Url, Error> {
        Url::parse(format!("{}{}", base, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })
    }

    async fn get_text(&self, url: Url, referer: Option<&str>) -> Result<String, Error> {
        let mut request = self
            .http
            .get(url)
            .header(USER_AGENT, get_user_agent())
            .header(ACCEPT, "*/*");
        if let Some(referer) = referer {
            request = request.header(REFERER, referer);
        }
        let resp = request.send().await.map_err(|e| {
            tracing::error!("Failed to get resource: {}", e);
            Error::RequestFailed
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }

    /// Fetches the open-end fund catalog matching the given query.
    pub async fn get_catalog(&self, query: &CatalogQuery) -> Result<RankPayload, Error> {
        let url = query.add_to_url(&Self::get_url(
            &self.catalog_base_url,
            "/data/rankhandler.aspx",
        )?);
        let referer = format!("{}/fundguzhi.html", self.catalog_base_url);
        let body = self.get_text(url, Some(&referer)).await?;
        RankPayload::parse(&body).map_err(|e| {
            tracing::error!("Failed to parse catalog: {} | body: {}", e, truncate_body(&body));
            e
        })
    }

    /// Fetches the static profile of one fund by its six-digit code.
    pub async fn get_fund_profile(&self, code: &str) -> Result<FundProfile, Error> {
        let url = Self::get_url(&self.profile_base_url, &format!("/djapi/fund/{}", code))?;
        let body = self.get_text(url, None).await?;
        let parsed = serde_json::from_str::<ProfileResponse>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::Decode(e.to_string())
        })?;

        if parsed.result_code != 0 {
            return Err(Error::Upstream {
                code: parsed.result_code,
                message: parsed.message.unwrap_or_default(),
            });
        }
        parsed
            .data
            .ok_or_else(|| Error::Decode(format!("profile for {} has no data", code)))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
