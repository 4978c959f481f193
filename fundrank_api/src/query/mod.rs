mod common;
pub use self::common::{Query, SortDirection};
mod catalog;
pub use self::catalog::{CatalogQuery, CatalogSortBy, FundType};
