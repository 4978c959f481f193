//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding report, workbook and input validation failures.
#[derive(Debug)]
pub enum FundRankError {
    /// An error from the underlying API client.
    Api(fundrank_api::Error),
    /// Writing the xlsx report failed.
    Report(rust_xlsxwriter::XlsxError),
    /// Reading a workbook back failed (missing sheet, corrupt file, ...).
    Workbook(String),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for FundRankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Report(e) => write!(f, "Report error: {}", e),
            Self::Workbook(msg) => write!(f, "Workbook error: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for FundRankError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Report(e) => Some(e),
            _ => None,
        }
    }
}

impl From<fundrank_api::Error> for FundRankError {
    fn from(e: fundrank_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<rust_xlsxwriter::XlsxError> for FundRankError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        Self::Report(e)
    }
}

impl From<calamine::XlsxError> for FundRankError {
    fn from(e: calamine::XlsxError) -> Self {
        Self::Workbook(e.to_string())
    }
}
