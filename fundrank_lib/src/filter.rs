//! Narrows the catalog to one category and share class.

use crate::model::FundCatalogEntry;

/// Name-substring criteria for one category.
///
/// All tests are case-sensitive substring matches on the fund's short name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Substring naming the category, e.g. an index family such as `沪深300`.
    pub category: String,
    /// Share-class marker the name must carry, e.g. `C`.
    pub share_class: String,
    /// Names containing any of these are dropped.
    pub denylist: Vec<String>,
}

impl FilterCriteria {
    /// Whether a fund name passes the criteria. A missing name never does.
    pub fn matches(&self, name: Option<&str>) -> bool {
        let Some(name) = name else {
            return false;
        };
        name.contains(self.category.as_str())
            && name.contains(self.share_class.as_str())
            && !self
                .denylist
                .iter()
                .any(|keyword| name.contains(keyword.as_str()))
    }
}

/// Returns the catalog entries matching `criteria`, in catalog order.
pub fn filter_catalog(catalog: &[FundCatalogEntry], criteria: &FilterCriteria) -> Vec<FundCatalogEntry> {
    let kept: Vec<FundCatalogEntry> = catalog
        .iter()
        .filter(|entry| criteria.matches(entry.name.as_deref()))
        .cloned()
        .collect();
    tracing::debug!(
        "Filter '{}' / '{}' kept {} of {} funds",
        criteria.category,
        criteria.share_class,
        kept.len(),
        catalog.len()
    );
    kept
}
