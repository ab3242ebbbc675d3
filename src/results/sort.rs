//! Sort functionality for results.
//!
//! Sorting runs after filtering and before pagination. Every criterion uses
//! a stable sort so ties keep their input order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{Oc, Record};

/// Sort criteria
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortCriteria {
    /// Keep input order (default)
    #[default]
    Input,
    /// Sort by description (case-insensitive, A-Z)
    Description,
    /// Sort by value (descending - largest first)
    ValueDesc,
    /// Sort by parent key (A-Z, records without one last)
    WorkId,
    /// Sort by status (A-Z, records without one last)
    Status,
}

impl SortCriteria {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SortCriteria::Input => "Input Order",
            SortCriteria::Description => "Description (A-Z)",
            SortCriteria::ValueDesc => "Value (High to Low)",
            SortCriteria::WorkId => "Work (A-Z)",
            SortCriteria::Status => "Status (A-Z)",
        }
    }

    /// Get all sort criteria
    pub fn all() -> &'static [SortCriteria] {
        &[
            SortCriteria::Input,
            SortCriteria::Description,
            SortCriteria::ValueDesc,
            SortCriteria::WorkId,
            SortCriteria::Status,
        ]
    }
}

/// Fields a record exposes for ordering beyond [`Record`].
pub trait SortFields: Record {
    fn label(&self) -> &str;
    fn amount(&self) -> f64;
}

impl SortFields for Oc {
    fn label(&self) -> &str {
        &self.description
    }

    fn amount(&self) -> f64 {
        self.value
    }
}

/// Stable in-place sort of filtered records
pub fn sort_records<R: SortFields>(records: &mut [&R], criteria: SortCriteria) {
    match criteria {
        SortCriteria::Input => {}
        SortCriteria::Description => {
            records.sort_by_cached_key(|r| r.label().to_lowercase());
        }
        SortCriteria::ValueDesc => {
            records.sort_by(|a, b| {
                b.amount()
                    .partial_cmp(&a.amount())
                    .unwrap_or(Ordering::Equal)
            });
        }
        SortCriteria::WorkId => {
            records.sort_by(|a, b| missing_last(a.parent_key(), b.parent_key()));
        }
        SortCriteria::Status => {
            records.sort_by(|a, b| missing_last(a.status(), b.status()));
        }
    }
}

fn missing_last(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}
