//! Compiled hours matrix: minutes worked per user per cost center.
//!
//! Rows come from the operations catalog (one per sub-operation), columns
//! are the active users. Each RD's minutes are credited to one cost center:
//! its explicit sub-operation, else the first sub-operation of its
//! operation (or of the month's assigned operation), else the raw operation
//! name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::fetch::{fetch_batch, RdSource};
use super::months::MonthRange;
use super::rd::{Assignments, RdDocument, RdUser};
use super::YearMonth;
use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubOperation {
    /// Cost center number; orders rows within an operation
    pub cte: i64,
    #[serde(default)]
    pub contabil: String,
    /// Cost center name
    pub obra: String,
}

/// An operation (client contract) and its cost centers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub sub_operations: Vec<SubOperation>,
}

/// One matrix row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogRow {
    pub operation: String,
    pub cte: i64,
    pub contabil: String,
    pub obra: String,
}

/// Flattened, ordered operations catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationsCatalog {
    rows: Vec<CatalogRow>,
    first_child: HashMap<String, String>,
}

impl OperationsCatalog {
    /// Rows sorted by upper-cased operation name, then `cte`.
    pub fn new(operations: &[Operation]) -> Self {
        let mut rows = Vec::new();
        let mut first_child = HashMap::new();

        for op in operations {
            let mut subs: Vec<&SubOperation> = op.sub_operations.iter().collect();
            subs.sort_by_key(|s| s.cte);
            if let Some(first) = subs.first().filter(|s| !s.obra.is_empty()) {
                first_child.insert(op.name.clone(), first.obra.clone());
            }
            rows.extend(subs.into_iter().map(|s| CatalogRow {
                operation: op.name.clone(),
                cte: s.cte,
                contabil: s.contabil.clone(),
                obra: s.obra.clone(),
            }));
        }

        rows.sort_by(|a, b| {
            a.operation
                .to_uppercase()
                .cmp(&b.operation.to_uppercase())
                .then(a.cte.cmp(&b.cte))
        });

        Self { rows, first_child }
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    /// Cost center credited with an RD's minutes.
    pub fn resolve(
        &self,
        period: YearMonth,
        rd: &RdDocument,
        assignments: &Assignments,
    ) -> Option<String> {
        if let Some(obra) = rd.sub_operation_obra() {
            return Some(obra.to_string());
        }
        let assigned = assignments
            .get(&period.storage_key())
            .map(String::as_str)
            .filter(|s| !s.is_empty());
        let raw = rd.operation().or(assigned)?;
        Some(
            self.first_child
                .get(raw)
                .cloned()
                .unwrap_or_else(|| raw.to_string()),
        )
    }
}

/// A matrix column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserColumn {
    pub id: String,
    pub full_name: String,
    pub first_name: String,
}

/// Minutes per (user, cost center).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoursMatrix {
    pub rows: Vec<CatalogRow>,
    pub users: Vec<UserColumn>,
    minutes: HashMap<String, HashMap<String, u64>>,
}

impl HoursMatrix {
    pub fn minutes(&self, user_id: &str, obra: &str) -> u64 {
        self.minutes
            .get(user_id)
            .and_then(|m| m.get(obra))
            .copied()
            .unwrap_or(0)
    }

    /// Sum over the catalog rows only; minutes credited to names outside
    /// the catalog are not counted.
    pub fn user_total(&self, user_id: &str) -> u64 {
        self.rows.iter().map(|r| self.minutes(user_id, &r.obra)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.users.is_empty()
    }
}

/// RDs for one user, keyed by their period.
#[derive(Debug, Clone, Default)]
pub struct UserRds {
    pub user: RdUser,
    pub rds: Vec<(YearMonth, RdDocument)>,
    pub assignments: Assignments,
}

/// Build the matrix from already-fetched RDs. Archived users are skipped.
pub fn compile_hours(catalog: &OperationsCatalog, data: &[UserRds]) -> HoursMatrix {
    let mut minutes: HashMap<String, HashMap<String, u64>> = HashMap::new();
    let mut users = Vec::new();

    for entry in data.iter().filter(|d| !d.user.archived) {
        let per_user = minutes.entry(entry.user.id.clone()).or_default();
        for (period, rd) in &entry.rds {
            let worked = rd.minutes();
            if worked <= 0.0 {
                continue;
            }
            if let Some(target) = catalog.resolve(*period, rd, &entry.assignments) {
                *per_user.entry(target).or_insert(0) += worked.round() as u64;
            }
        }
        users.push(UserColumn {
            id: entry.user.id.clone(),
            full_name: entry.user.display_name().to_string(),
            first_name: entry.user.first_name().to_string(),
        });
    }

    users.sort_by_cached_key(|u| u.first_name.to_lowercase());

    HoursMatrix {
        rows: catalog.rows().to_vec(),
        users,
        minutes,
    }
}

/// Fetch the catalog, users and RDs over `range`, then compile.
///
/// Failed reads are logged by the batch and left out of the matrix.
pub fn load_hours<S: RdSource + ?Sized>(source: &S, range: &MonthRange) -> Result<HoursMatrix> {
    let catalog = OperationsCatalog::new(&source.operations()?);
    let users: Vec<RdUser> = source
        .users()?
        .into_iter()
        .filter(|u| !u.archived)
        .collect();
    let mut batch = fetch_batch(source, &users, range);

    let mut by_user: HashMap<String, Vec<(YearMonth, RdDocument)>> = HashMap::new();
    for fetched in batch.reports.drain(..) {
        by_user
            .entry(fetched.user_id)
            .or_default()
            .push((fetched.period, fetched.rd));
    }

    let data: Vec<UserRds> = users
        .into_iter()
        .map(|user| UserRds {
            rds: by_user.remove(&user.id).unwrap_or_default(),
            assignments: batch.assignments.remove(&user.id).unwrap_or_default(),
            user,
        })
        .collect();

    Ok(compile_hours(&catalog, &data))
}

/// Render minutes as `h:mm`, or `-` for zero.
pub fn format_minutes(minutes: u64) -> String {
    if minutes == 0 {
        return "-".to_string();
    }
    format!("{}:{:02}", minutes / 60, minutes % 60)
}
