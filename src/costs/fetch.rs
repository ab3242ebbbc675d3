//! Fail-soft batch reads of RD documents.
//!
//! One read is issued per (user, month) pair and the whole batch settles
//! before anything is aggregated. A failed read is logged and recorded in
//! [`FetchBatch::failures`]; it never aborts the batch and is not retried.

use std::collections::HashMap;

use rayon::prelude::*;

use super::aggregate::{aggregate_costs, flatten_report, CostEntry, CostReport};
use super::hours::Operation;
use super::months::{MonthRange, YearMonth};
use super::rd::{Assignments, RdDocument, RdUser};
use crate::config::Labels;
use crate::errors::{Error, Result};

/// Read access to the RD store.
///
/// Implementations must be shareable across threads; reads for different
/// pairs run in parallel.
pub trait RdSource: Sync {
    /// Every user, including archived ones.
    fn users(&self) -> Result<Vec<RdUser>>;

    /// The user's RD for one month, `None` if it was never filed.
    fn rd(&self, user_id: &str, month: YearMonth) -> Result<Option<RdDocument>>;

    /// The user's month-keyed operation assignments.
    fn assignments(&self, user_id: &str) -> Result<Assignments>;

    /// The operations catalog used by the hours matrix.
    fn operations(&self) -> Result<Vec<Operation>>;
}

/// An RD that was read successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedRd {
    pub user_id: String,
    pub period: YearMonth,
    pub rd: RdDocument,
}

/// Everything one batch produced.
#[derive(Debug, Default)]
pub struct FetchBatch {
    pub reports: Vec<FetchedRd>,
    pub assignments: HashMap<String, Assignments>,
    pub failures: Vec<Error>,
    /// Pairs read successfully but with no document filed
    pub missing: usize,
}

impl FetchBatch {
    /// Flatten every fetched RD into cost entries.
    pub fn entries(&self, labels: &Labels) -> Vec<CostEntry> {
        let empty = Assignments::new();
        self.reports
            .iter()
            .flat_map(|fetched| {
                let assignments = self.assignments.get(&fetched.user_id).unwrap_or(&empty);
                flatten_report(fetched.period, &fetched.rd, assignments, labels)
            })
            .collect()
    }
}

enum PairOutcome {
    Found(FetchedRd),
    Missing,
    Failed(Error),
}

/// Read every (user, month) pair of `range` for `users`.
pub fn fetch_batch<S: RdSource + ?Sized>(
    source: &S,
    users: &[RdUser],
    range: &MonthRange,
) -> FetchBatch {
    let months: Vec<YearMonth> = range.months().collect();
    let pairs: Vec<(&RdUser, YearMonth)> = users
        .iter()
        .flat_map(|u| months.iter().map(move |m| (u, *m)))
        .collect();

    log::debug!(
        "Fetching {} RDs ({} users x {} months)",
        pairs.len(),
        users.len(),
        months.len()
    );

    // A failed assignments read degrades to an empty map.
    let (assignments, mut failures): (HashMap<String, Assignments>, Vec<Error>) = {
        let results: Vec<(String, Result<Assignments>)> = users
            .par_iter()
            .map(|u| (u.id.clone(), source.assignments(&u.id)))
            .collect();
        let mut ok = HashMap::with_capacity(results.len());
        let mut failed = Vec::new();
        for (user_id, result) in results {
            match result {
                Ok(map) => {
                    ok.insert(user_id, map);
                }
                Err(e) => {
                    log::warn!("Assignments for '{user_id}' unavailable: {e}");
                    failed.push(e);
                }
            }
        }
        (ok, failed)
    };

    let outcomes: Vec<PairOutcome> = pairs
        .par_iter()
        .map(|(user, period)| match source.rd(&user.id, *period) {
            Ok(Some(rd)) => PairOutcome::Found(FetchedRd {
                user_id: user.id.clone(),
                period: *period,
                rd,
            }),
            Ok(None) => PairOutcome::Missing,
            Err(e) => PairOutcome::Failed(e),
        })
        .collect();

    let mut batch = FetchBatch {
        assignments,
        ..Default::default()
    };
    for outcome in outcomes {
        match outcome {
            PairOutcome::Found(fetched) => batch.reports.push(fetched),
            PairOutcome::Missing => batch.missing += 1,
            PairOutcome::Failed(e) => {
                log::warn!("Skipping RD: {e}");
                failures.push(e);
            }
        }
    }
    batch.failures = failures;
    batch
}

/// A cost report plus the reads that failed while building it.
#[derive(Debug)]
pub struct CostRun {
    pub report: CostReport,
    pub failures: Vec<Error>,
}

/// List users, fetch their RDs over `range` and aggregate.
///
/// Only the user listing is fatal; per-pair failures end up in
/// [`CostRun::failures`].
pub fn build_cost_report<S: RdSource + ?Sized>(
    source: &S,
    range: &MonthRange,
    labels: &Labels,
) -> Result<CostRun> {
    let users = source.users()?;
    let batch = fetch_batch(source, &users, range);
    let entries = batch.entries(labels);
    let report = aggregate_costs(&entries, range, labels);
    Ok(CostRun {
        report,
        failures: batch.failures,
    })
}
