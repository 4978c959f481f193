//! Descending ranking on one return column.

use std::cmp::Ordering;

use crate::model::{EnrichedFundRecord, FundCategoryResult, ReturnColumn};

/// Orders two optional returns from best to worst.
///
/// Present values compare descending; a missing value ranks below every
/// present value, negative returns included. Two missing values are equal.
pub fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts records by `column`, best first. Ties keep their input order.
pub fn rank_records(records: &mut [EnrichedFundRecord], column: ReturnColumn) {
    records.sort_by(|a, b| descending(a.return_of(column), b.return_of(column)));
}

impl FundCategoryResult {
    /// Ranks `records` by `sort_column` and wraps them as one category's result.
    pub fn ranked(
        category: &str,
        share_class: &str,
        mut records: Vec<EnrichedFundRecord>,
        sort_column: ReturnColumn,
    ) -> Self {
        rank_records(&mut records, sort_column);
        Self {
            category: category.to_string(),
            share_class: share_class.to_string(),
            sort_column,
            records,
        }
    }
}
