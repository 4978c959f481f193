//! Top-N membership and hit counts across the evaluated return columns.
//!
//! The plan only tags cells; how a tag is rendered (colours, fonts) is up to
//! the report writer.

use std::collections::HashSet;

use crate::model::{EnrichedFundRecord, ReturnColumn};

/// Parameters of the highlight computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightRules {
    /// Columns scanned for top-N membership.
    pub columns: Vec<ReturnColumn>,
    /// Size of each column's top set.
    pub top_n: usize,
    /// Hits needed for the name cell to be strongly emphasized.
    pub hit_threshold: usize,
}

impl Default for HighlightRules {
    fn default() -> Self {
        Self {
            columns: vec![
                ReturnColumn::OneMonth,
                ReturnColumn::ThreeMonths,
                ReturnColumn::SixMonths,
                ReturnColumn::OneYear,
                ReturnColumn::YearToDate,
            ],
            top_n: 10,
            hit_threshold: 4,
        }
    }
}

/// Emphasis applied to one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Emphasis {
    Plain,
    /// The cell is in its column's top-N set.
    TopN,
    /// The fund reached the hit threshold; applied to the name cell.
    Strong,
}

/// Row indices of the `n` largest present values.
///
/// Ties are broken by row order, so with `[5, 3, 3, 1]` and `n = 2` the rows
/// holding 5 and the first 3 are chosen. Missing values are never selected,
/// even when fewer than `n` rows have a value. The result is in rank order.
pub fn top_n_rows(values: &[Option<f64>], n: usize) -> Vec<usize> {
    let mut present: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(idx, value)| value.map(|v| (idx, v)))
        .collect();
    present.sort_by(|a, b| crate::rank::descending(Some(a.1), Some(b.1)));
    present.into_iter().take(n).map(|(idx, _)| idx).collect()
}

/// Emphasis for every cell of one ranked category, computed fresh each run.
#[derive(Clone, Debug)]
pub struct HighlightPlan {
    rules: HighlightRules,
    /// One set of row indices per evaluated column, same order as `rules.columns`.
    top_sets: Vec<HashSet<usize>>,
    hit_counts: Vec<usize>,
}

impl HighlightPlan {
    pub fn for_records(records: &[EnrichedFundRecord], rules: &HighlightRules) -> Self {
        let mut hit_counts = vec![0; records.len()];
        let top_sets: Vec<HashSet<usize>> = rules
            .columns
            .iter()
            .map(|column| {
                let values: Vec<Option<f64>> =
                    records.iter().map(|r| r.return_of(*column)).collect();
                let rows: HashSet<usize> = top_n_rows(&values, rules.top_n).into_iter().collect();
                for row in &rows {
                    hit_counts[*row] += 1;
                }
                rows
            })
            .collect();

        let plan = Self {
            rules: rules.clone(),
            top_sets,
            hit_counts,
        };
        tracing::debug!(
            "Highlight plan: {} rows, {} strongly emphasized",
            records.len(),
            plan.strong_rows().len()
        );
        plan
    }

    /// Emphasis of the return cell at (`row`, `column`).
    pub fn cell(&self, row: usize, column: ReturnColumn) -> Emphasis {
        let in_top = self
            .rules
            .columns
            .iter()
            .position(|c| *c == column)
            .map(|idx| self.top_sets[idx].contains(&row))
            .unwrap_or(false);
        if in_top {
            Emphasis::TopN
        } else {
            Emphasis::Plain
        }
    }

    /// Emphasis of the name cell in `row`.
    pub fn name_emphasis(&self, row: usize) -> Emphasis {
        if self.hit_count(row) >= self.rules.hit_threshold {
            Emphasis::Strong
        } else {
            Emphasis::Plain
        }
    }

    /// Number of evaluated columns in which `row` is in the top set.
    pub fn hit_count(&self, row: usize) -> usize {
        self.hit_counts.get(row).copied().unwrap_or(0)
    }

    /// Rows whose name cell is strongly emphasized, in row order.
    pub fn strong_rows(&self) -> Vec<usize> {
        (0..self.hit_counts.len())
            .filter(|row| self.name_emphasis(*row) == Emphasis::Strong)
            .collect()
    }

    pub fn rules(&self) -> &HighlightRules {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::FundCode;
    use crate::model::{FundCatalogEntry, Returns};

    fn record(seq: u32, values: &[(ReturnColumn, f64)]) -> EnrichedFundRecord {
        let mut returns = Returns::default();
        for (column, value) in values {
            returns.set(*column, Some(*value));
        }
        EnrichedFundRecord::blank(FundCatalogEntry {
            seq,
            code: FundCode::from_integer(seq as i64),
            name: Some(format!("基金{}C", seq)),
            nav_date: None,
            unit_nav: None,
            accum_nav: None,
            returns,
            fee: None,
        })
    }

    #[test]
    fn ties_break_by_row_order() {
        let values = [Some(5.0), Some(3.0), Some(3.0), Some(1.0)];
        assert_eq!(top_n_rows(&values, 2), vec![0, 1]);
    }

    #[test]
    fn missing_values_never_selected() {
        let values = [None, Some(-1.0), None];
        assert_eq!(top_n_rows(&values, 10), vec![1]);
    }

    #[test]
    fn n_larger_than_rows_selects_all_present() {
        let values = [Some(1.0), Some(2.0)];
        assert_eq!(top_n_rows(&values, 10), vec![1, 0]);
        assert!(top_n_rows(&values, 0).is_empty());
    }

    fn two_row_rules(threshold: usize) -> HighlightRules {
        HighlightRules {
            top_n: 1,
            hit_threshold: threshold,
            ..HighlightRules::default()
        }
    }

    #[test]
    fn four_of_five_hits_is_strong() {
        let rules = two_row_rules(4);
        // Row 0 leads four of the five evaluated columns; row 1 leads 近1年.
        let records = vec![
            record(
                1,
                &[
                    (ReturnColumn::OneMonth, 9.0),
                    (ReturnColumn::ThreeMonths, 9.0),
                    (ReturnColumn::SixMonths, 9.0),
                    (ReturnColumn::OneYear, 1.0),
                    (ReturnColumn::YearToDate, 9.0),
                ],
            ),
            record(
                2,
                &[
                    (ReturnColumn::OneMonth, 1.0),
                    (ReturnColumn::ThreeMonths, 1.0),
                    (ReturnColumn::SixMonths, 1.0),
                    (ReturnColumn::OneYear, 9.0),
                    (ReturnColumn::YearToDate, 1.0),
                ],
            ),
        ];
        let plan = HighlightPlan::for_records(&records, &rules);
        assert_eq!(plan.hit_count(0), 4);
        assert_eq!(plan.hit_count(1), 1);
        assert_eq!(plan.name_emphasis(0), Emphasis::Strong);
        assert_eq!(plan.name_emphasis(1), Emphasis::Plain);
        assert_eq!(plan.strong_rows(), vec![0]);
    }

    #[test]
    fn three_of_five_hits_is_not_strong() {
        let rules = two_row_rules(4);
        let records = vec![
            record(
                1,
                &[
                    (ReturnColumn::OneMonth, 9.0),
                    (ReturnColumn::ThreeMonths, 9.0),
                    (ReturnColumn::SixMonths, 9.0),
                    (ReturnColumn::OneYear, 1.0),
                    (ReturnColumn::YearToDate, 1.0),
                ],
            ),
            record(
                2,
                &[
                    (ReturnColumn::OneMonth, 1.0),
                    (ReturnColumn::ThreeMonths, 1.0),
                    (ReturnColumn::SixMonths, 1.0),
                    (ReturnColumn::OneYear, 9.0),
                    (ReturnColumn::YearToDate, 9.0),
                ],
            ),
        ];
        let plan = HighlightPlan::for_records(&records, &rules);
        assert_eq!(plan.hit_count(0), 3);
        assert_eq!(plan.name_emphasis(0), Emphasis::Plain);
        assert!(plan.strong_rows().is_empty());
    }

    #[test]
    fn cell_emphasis_only_on_evaluated_columns() {
        let records = vec![record(
            1,
            &[(ReturnColumn::SixMonths, 2.0), (ReturnColumn::Week, 5.0)],
        )];
        let plan = HighlightPlan::for_records(&records, &HighlightRules::default());
        assert_eq!(plan.cell(0, ReturnColumn::SixMonths), Emphasis::TopN);
        assert_eq!(plan.cell(0, ReturnColumn::OneMonth), Emphasis::Plain);
        assert_eq!(plan.cell(0, ReturnColumn::Week), Emphasis::Plain);
    }

    #[test]
    fn empty_records_give_empty_plan() {
        let plan = HighlightPlan::for_records(&[], &HighlightRules::default());
        assert_eq!(plan.hit_count(0), 0);
        assert!(plan.strong_rows().is_empty());
    }
}
