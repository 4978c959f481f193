//! `serve`: paginated JSON view of a finished ranking workbook.
//!
//! `GET /` returns the ranking page; `GET /get_fund_data?sheet=&page=&limit=`
//! returns `{code, msg, count, data}`. Every response is HTTP 200; failures
//! are reported with `code = 1`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use clap::Args;
use fundrank_lib::{read_sheet, validation, FundRankError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_WORKBOOK: &str = "基金C份额收益率排名_20250924.xlsx";
pub const DEFAULT_SHEET: &str = "沪深300基金";
pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MISSING_WORKBOOK_MSG: &str = "Excel文件不存在";

const INDEX_PAGE: &str = include_str!("../../templates/fund_ranking.html");

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Workbook to serve
    #[arg(long, default_value = DEFAULT_WORKBOOK)]
    pub workbook: PathBuf,

    /// Sheet used when a request names none
    #[arg(long, default_value = DEFAULT_SHEET)]
    pub default_sheet: String,
}

#[derive(Clone)]
pub struct AppState {
    workbook: Arc<PathBuf>,
    default_sheet: Arc<String>,
}

impl AppState {
    pub fn new(workbook: PathBuf, default_sheet: String) -> Self {
        Self {
            workbook: Arc::new(workbook),
            default_sheet: Arc::new(default_sheet),
        }
    }
}

/// Query parameters, kept as text so malformed numbers become `code = 1`
/// responses instead of extractor rejections.
#[derive(Debug, Default, Deserialize)]
pub struct FundDataParams {
    pub sheet: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FundDataResponse {
    pub code: u8,
    pub msg: String,
    pub count: usize,
    pub data: Vec<Map<String, Value>>,
}

impl FundDataResponse {
    fn success(count: usize, data: Vec<Map<String, Value>>) -> Self {
        Self {
            code: 0,
            msg: "success".to_string(),
            count,
            data,
        }
    }

    fn error(msg: impl Into<String>) -> Self {
        Self {
            code: 1,
            msg: msg.into(),
            count: 0,
            data: Vec::new(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/get_fund_data", get(get_fund_data))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

async fn get_fund_data(
    State(state): State<AppState>,
    Query(params): Query<FundDataParams>,
) -> Json<FundDataResponse> {
    let workbook = state.workbook.clone();
    let default_sheet = state.default_sheet.clone();
    // Workbook parsing is blocking file I/O.
    let response = tokio::task::spawn_blocking(move || {
        fund_data_response(&workbook, &default_sheet, &params)
    })
    .await
    .unwrap_or_else(|e| {
        tracing::error!("Fund data task failed: {}", e);
        FundDataResponse::error(e.to_string())
    });
    Json(response)
}

/// Builds the `/get_fund_data` response for one request.
pub fn fund_data_response(
    workbook: &Path,
    default_sheet: &str,
    params: &FundDataParams,
) -> FundDataResponse {
    let sheet = params.sheet.as_deref().unwrap_or(default_sheet);
    let (page, limit) = match pagination(params) {
        Ok(p) => p,
        Err(e) => return FundDataResponse::error(e.to_string()),
    };

    if !workbook.exists() {
        return FundDataResponse::error(MISSING_WORKBOOK_MSG);
    }

    match read_sheet(workbook, sheet) {
        Ok(table) => FundDataResponse::success(table.len(), table.page(page, limit)),
        Err(e) => {
            tracing::warn!("Failed to read sheet {}: {}", sheet, e);
            FundDataResponse::error(e.to_string())
        }
    }
}

fn pagination(params: &FundDataParams) -> Result<(usize, usize), FundRankError> {
    let page = match &params.page {
        Some(raw) => validation::parse_integer("page", raw)?,
        None => DEFAULT_PAGE,
    };
    let limit = match &params.limit {
        Some(raw) => validation::parse_integer("limit", raw)?,
        None => DEFAULT_LIMIT,
    };
    Ok((validation::validate_page(page)?, validation::validate_limit(limit)?))
}

pub async fn run(args: &ServeArgs) -> Result<()> {
    let default_sheet = validation::validate_sheet_name(&args.default_sheet)?;
    if !args.workbook.exists() {
        tracing::warn!(
            "Workbook {} does not exist yet; requests will report it missing",
            args.workbook.display()
        );
    }

    let app = router(AppState::new(args.workbook.clone(), default_sheet));
    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    tracing::info!("Serving {} on http://{}", args.workbook.display(), args.bind);
    axum::serve(listener, app).await?;
    Ok(())
}
