//! Shared query infrastructure: the [`Query`] trait, [`QueryCommon`] fields, and [`SortDirection`].

use std::str::FromStr;

use chrono::{Months, NaiveDate};
use url::Url;

/// Trait implemented by all query builders. Provides URL serialization and
/// shared builder methods for pagination, the reporting window, and sort direction.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the page number (1-indexed).
    fn with_page(mut self, page: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().page = page;
        self
    }

    /// Sets the number of results per page.
    fn with_page_size(mut self, page_size: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().page_size = page_size;
        self
    }

    /// Sets the reporting window. The upstream ranks over `[start, end]`.
    fn with_window(mut self, start: NaiveDate, end: NaiveDate) -> Self
    where
        Self: Sized,
    {
        let common = self.get_common();
        common.window = Some((start, end));
        self
    }

    /// Sets the sort direction (ascending or descending).
    fn with_sort_direction(mut self, sort_direction: SortDirection) -> Self
    where
        Self: Sized,
    {
        self.get_common().sort_direction = sort_direction;
        self
    }
}

/// Sort order for API results.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (smallest first).
    Asc = 0,
    /// Descending order (largest first). This is the default.
    #[default]
    Desc = 1,
}
impl SortDirection {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}
impl FromStr for SortDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(()),
        }
    }
}

/// Fields shared by all query types: pagination, reporting window, and sort direction.
#[derive(Clone, Copy, Debug)]
pub struct QueryCommon {
    /// Page number (1-indexed). Defaults to 1.
    pub page: i64,
    /// Results per page. Large enough by default to return the whole catalog in one call.
    pub page_size: i64,
    /// Reporting window. `None` means the trailing year ending today.
    pub window: Option<(NaiveDate, NaiveDate)>,
    /// Sort direction. Defaults to descending.
    pub sort_direction: SortDirection,
}

impl Default for QueryCommon {
    fn default() -> QueryCommon {
        QueryCommon {
            page: 1,
            page_size: 30000,
            window: None,
            sort_direction: SortDirection::Desc,
        }
    }
}

impl QueryCommon {
    /// Resolves the reporting window, defaulting to one year back from `today`.
    pub fn resolve_window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        self.window.unwrap_or_else(|| {
            let start = today.checked_sub_months(Months::new(12)).unwrap_or(today);
            (start, today)
        })
    }

    /// Appends the common pagination, window and direction parameters to the URL.
    pub fn add_to_url(&self, url: &Url, today: NaiveDate) -> Url {
        let mut url = url.clone();
        let (start, end) = self.resolve_window(today);
        url.query_pairs_mut()
            .append_pair("st", self.sort_direction.as_param())
            .append_pair("sd", &start.format("%Y-%m-%d").to_string())
            .append_pair("ed", &end.format("%Y-%m-%d").to_string())
            .append_pair("pi", &self.page.to_string())
            .append_pair("pn", &self.page_size.to_string());
        url
    }
}
