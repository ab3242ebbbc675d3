//! Parent-key grouping for list records.
//!
//! Groups keep the first-seen order of their key while scanning the input,
//! and records keep their input order inside a group. Records without a
//! parent key share a single fallback bucket.

use buckets::OrderedBuckets;

use super::rollup::{BudgetBand, BudgetRollup};
use crate::config::BudgetBands;
use crate::model::Record;

/// A key plus the records that resolved to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'r, R> {
    /// Parent identifier, or the fallback label
    pub key: String,
    /// Records in input order
    pub records: Vec<&'r R>,
}

impl<R> Group<'_, R> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Group records by an arbitrary key function.
///
/// `None` and blank keys go to `fallback`.
pub fn group_records<'r, R, K>(
    records: impl IntoIterator<Item = &'r R>,
    key_fn: K,
    fallback: &str,
) -> Vec<Group<'r, R>>
where
    R: 'r,
    K: Fn(&R) -> Option<&str>,
{
    let mut buckets = OrderedBuckets::default();
    for record in records {
        let key = key_fn(record)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(fallback);
        buckets.push(key, record);
    }
    buckets
        .into_groups()
        .map(|(key, records)| Group { key, records })
        .collect()
}

/// Group records by [`Record::parent_key`].
pub fn group_by_parent<'r, R: Record + 'r>(
    records: impl IntoIterator<Item = &'r R>,
    fallback: &str,
) -> Vec<Group<'r, R>> {
    group_records(records, |r| r.parent_key(), fallback)
}

/// Aggregated figures for one group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub key: String,
    pub record_count: usize,
    pub budget_total: f64,
    pub consumed_total: f64,
    pub rollup: BudgetRollup,
}

impl GroupSummary {
    /// Band for the group's progress bar, `None` when no budget is set.
    pub fn band(&self, bands: &BudgetBands) -> Option<BudgetBand> {
        self.rollup.band(bands)
    }
}

/// Summarize a group with caller-supplied budget and consumption accessors.
pub fn summarize<R, B, C>(group: &Group<'_, R>, budget_of: B, consumed_of: C) -> GroupSummary
where
    B: Fn(&R) -> f64,
    C: Fn(&R) -> f64,
{
    let budget_total: f64 = group.records.iter().map(|r| budget_of(r)).sum();
    let consumed_total: f64 = group.records.iter().map(|r| consumed_of(r)).sum();

    GroupSummary {
        key: group.key.clone(),
        record_count: group.records.len(),
        budget_total,
        consumed_total,
        rollup: BudgetRollup::new(consumed_total, budget_total),
    }
}

/// Insertion-ordered multimap used by the grouping reducer.
mod buckets {
    use std::collections::HashMap;

    pub(super) struct OrderedBuckets<'r, R> {
        positions: HashMap<String, usize>,
        buckets: Vec<(String, Vec<&'r R>)>,
    }

    impl<R> Default for OrderedBuckets<'_, R> {
        fn default() -> Self {
            Self {
                positions: HashMap::new(),
                buckets: Vec::new(),
            }
        }
    }

    impl<'r, R> OrderedBuckets<'r, R> {
        pub(super) fn push(&mut self, key: &str, record: &'r R) {
            match self.positions.get(key) {
                Some(&idx) => self.buckets[idx].1.push(record),
                None => {
                    self.positions.insert(key.to_string(), self.buckets.len());
                    self.buckets.push((key.to_string(), vec![record]));
                }
            }
        }

        pub(super) fn into_groups(self) -> impl Iterator<Item = (String, Vec<&'r R>)> {
            self.buckets.into_iter()
        }
    }
}
