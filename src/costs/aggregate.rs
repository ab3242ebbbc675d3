//! Category roll-up of monthly cost entries.
//!
//! RD documents are first flattened into [`CostEntry`] values, resolving the
//! category and sub-category of each invoice and refund through its fallback
//! chain. [`aggregate_costs`] then sums the positive amounts that fall inside
//! the requested months into a [`CostReport`].

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::currency::{parse_brl, MoneyValue};
use super::months::{MonthRange, YearMonth};
use super::rd::{Assignments, RdDocument};
use crate::config::Labels;
use crate::model::non_empty;

/// Where an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Invoice,
    Refund,
}

/// One monetary line attributed to a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEntry {
    pub period: YearMonth,
    pub category: String,
    pub subcategory: String,
    pub value: MoneyValue,
    pub kind: EntryKind,
}

impl CostEntry {
    pub fn new(
        period: YearMonth,
        category: impl Into<String>,
        subcategory: impl Into<String>,
        value: impl Into<MoneyValue>,
        kind: EntryKind,
    ) -> Self {
        Self {
            period,
            category: category.into(),
            subcategory: subcategory.into(),
            value: value.into(),
            kind,
        }
    }
}

/// Flatten one RD into cost entries.
///
/// Invoice: skipped when rejected; category is `rd.operation`, then the
/// month's assignment, then the uncategorized label; sub-category is the
/// RD's sub-operation or the invoice label.
///
/// Refund: category is `refund.operation`, then `rd.operation`, then the
/// assignment, then uncategorized; sub-category is the refund's
/// sub-operation, then its expense type, then the refund label.
pub fn flatten_report(
    period: YearMonth,
    rd: &RdDocument,
    assignments: &Assignments,
    labels: &Labels,
) -> Vec<CostEntry> {
    let assigned = non_empty(assignments.get(&period.storage_key()).map(String::as_str));
    let mut entries = Vec::with_capacity(rd.refunds.len() + 1);

    if !rd.invoice_rejected {
        let invoice_value = rd
            .invoice_data
            .as_ref()
            .and_then(|inv| non_empty(inv.value.as_deref()));
        if let Some(raw) = invoice_value {
            match parse_brl(raw) {
                Some(value) => {
                    let category = rd
                        .operation()
                        .or(assigned)
                        .unwrap_or(labels.uncategorized.as_str());
                    let subcategory = rd
                        .sub_operation_obra()
                        .unwrap_or(labels.invoice_subcategory.as_str());
                    entries.push(CostEntry::new(
                        period,
                        category,
                        subcategory,
                        value,
                        EntryKind::Invoice,
                    ));
                }
                None => log::debug!("Discarding unparseable invoice value '{raw}' ({period})"),
            }
        }
    }

    for refund in &rd.refunds {
        let Some(value) = refund.value.clone() else {
            continue;
        };
        let category = non_empty(refund.operation.as_deref())
            .or(rd.operation())
            .or(assigned)
            .unwrap_or(labels.uncategorized.as_str());
        let subcategory = refund
            .sub_operation
            .as_ref()
            .and_then(|s| s.obra())
            .or(non_empty(refund.expense_type.as_deref()))
            .unwrap_or(labels.refund_subcategory.as_str());
        entries.push(CostEntry::new(
            period,
            category,
            subcategory,
            value,
            EntryKind::Refund,
        ));
    }

    entries
}

/// Totals for one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryBucket {
    pub total: f64,
    pub subcategories: HashMap<String, f64>,
}

/// One row of a ranking, with its share of the scope total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedItem {
    pub name: String,
    pub total: f64,
    /// `None` when the scope total is zero
    pub percentage: Option<f64>,
}

/// Which level of the report a ranking reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scope {
    /// Categories against the grand total
    #[default]
    Overview,
    /// Sub-categories of one category against that category's total
    Category(String),
}

impl Scope {
    pub fn from_selection(selection: Option<&str>) -> Self {
        match non_empty(selection) {
            Some(name) => Scope::Category(name.to_string()),
            None => Scope::Overview,
        }
    }
}

/// Aggregated costs over a month range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostReport {
    pub categories: HashMap<String, CategoryBucket>,
    /// Every month of the range in order, including months with no entries
    pub months_covered: Vec<YearMonth>,
    /// Sum per month; months without entries are present with zero
    pub monthly_totals: BTreeMap<YearMonth, f64>,
    /// Entries dropped for a missing, unparseable or non-positive amount,
    /// or a period outside the range
    pub skipped: usize,
}

impl CostReport {
    fn empty(range: &MonthRange) -> Self {
        let months_covered: Vec<YearMonth> = range.months().collect();
        let monthly_totals = months_covered.iter().map(|m| (*m, 0.0)).collect();
        Self {
            categories: HashMap::new(),
            months_covered,
            monthly_totals,
            skipped: 0,
        }
    }

    fn add(&mut self, entry: &CostEntry, value: f64) {
        let bucket = self.categories.entry(entry.category.clone()).or_default();
        bucket.total += value;
        *bucket
            .subcategories
            .entry(entry.subcategory.clone())
            .or_insert(0.0) += value;
        *self.monthly_totals.entry(entry.period).or_insert(0.0) += value;
    }

    pub fn total(&self) -> f64 {
        self.categories.values().map(|b| b.total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category(&self, name: &str) -> Option<&CategoryBucket> {
        self.categories.get(name)
    }

    /// Full ranking for a scope, sorted by total descending then by name.
    ///
    /// Drilling into a category that is not in the report falls back to the
    /// overview.
    pub fn ranking(&self, scope: &Scope) -> Vec<RankedItem> {
        let drilled = match scope {
            Scope::Category(name) => self.categories.get(name),
            Scope::Overview => None,
        };

        match drilled {
            Some(bucket) => rank(
                bucket.subcategories.iter().map(|(k, v)| (k.as_str(), *v)),
                bucket.total,
            ),
            None => rank(
                self.categories.iter().map(|(k, b)| (k.as_str(), b.total)),
                self.total(),
            ),
        }
    }

    /// First `n` rows of [`ranking`](Self::ranking).
    pub fn top_n(&self, scope: &Scope, n: usize) -> Vec<RankedItem> {
        let mut ranked = self.ranking(scope);
        ranked.truncate(n);
        ranked
    }
}

fn rank<'a>(items: impl Iterator<Item = (&'a str, f64)>, scope_total: f64) -> Vec<RankedItem> {
    let mut ranked: Vec<RankedItem> = items
        .map(|(name, total)| RankedItem {
            name: name.to_string(),
            total,
            percentage: (scope_total > 0.0).then(|| 100.0 * total / scope_total),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked
}

/// Sum entries into a report over `range`.
///
/// Amounts are parsed here; entries whose amount is missing, unparseable or
/// not positive, and entries outside `range`, contribute nothing. Invoices
/// and refunds are additive into the same buckets. Blank categories and
/// sub-categories fall back to the configured labels.
pub fn aggregate_costs<'e>(
    entries: impl IntoIterator<Item = &'e CostEntry>,
    range: &MonthRange,
    labels: &Labels,
) -> CostReport {
    let mut report = CostReport::empty(range);

    for entry in entries {
        if !range.contains(entry.period) {
            report.skipped += 1;
            continue;
        }
        let value = match entry.value.amount() {
            Some(v) if v > 0.0 => v,
            other => {
                log::debug!(
                    "Discarding {:?} amount {:?} for {} ({})",
                    entry.kind,
                    other,
                    entry.category,
                    entry.period
                );
                report.skipped += 1;
                continue;
            }
        };

        if entry.category.trim().is_empty() || entry.subcategory.trim().is_empty() {
            let normalized = CostEntry {
                category: non_empty(Some(entry.category.as_str()))
                    .unwrap_or(labels.uncategorized.as_str())
                    .to_string(),
                subcategory: non_empty(Some(entry.subcategory.as_str()))
                    .unwrap_or(labels.general_subcategory.as_str())
                    .to_string(),
                ..entry.clone()
            };
            report.add(&normalized, value);
        } else {
            report.add(entry, value);
        }
    }

    report
}
