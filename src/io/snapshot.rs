//! JSON snapshots of the backend collections.
//!
//! A snapshot stands in for the live document store: it holds the control
//! tower collections (works, OCs, events) and everything the cost report
//! and hours matrix read (users, RDs, assignments, operations).

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::costs::{Assignments, Operation, RdDocument, RdSource, RdUser, YearMonth};
use crate::errors::{Error, Result};
use crate::model::{Oc, OcEvent, Work};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub works: Vec<Work>,
    pub ocs: Vec<Oc>,
    pub events: Vec<OcEvent>,
    pub users: Vec<RdUser>,
    /// RDs per user id, keyed by `YYYY-MM`
    pub rds: HashMap<String, BTreeMap<YearMonth, RdDocument>>,
    pub assignments: HashMap<String, Assignments>,
    pub operations: Vec<Operation>,
}

impl Snapshot {
    /// Top-level events plus the ones embedded in each OC.
    ///
    /// Embedded events inherit the OC's id when their own `oc_id` is blank.
    /// An event listed in both places is returned once, as its top-level copy.
    pub fn all_events(&self) -> Vec<OcEvent> {
        let mut seen: HashSet<&str> = self
            .events
            .iter()
            .map(|e| e.id.as_str())
            .filter(|id| !id.is_empty())
            .collect();
        let mut events = self.events.clone();
        for oc in &self.ocs {
            for e in &oc.events {
                if !e.id.is_empty() && !seen.insert(e.id.as_str()) {
                    continue;
                }
                let mut e = e.clone();
                if e.oc_id.trim().is_empty() {
                    e.oc_id = oc.id.clone();
                }
                events.push(e);
            }
        }
        events
    }

    fn check(&self, path: &Path) -> Result<()> {
        let mut seen = HashSet::new();
        if let Some(dup) = self.ocs.iter().find(|oc| !seen.insert(oc.id.as_str())) {
            return Err(Error::snapshot(path, format!("duplicate OC id '{}'", dup.id)));
        }

        let users: HashSet<&str> = self.users.iter().map(|u| u.id.as_str()).collect();
        for user_id in self.rds.keys().filter(|id| !users.contains(id.as_str())) {
            log::warn!("RDs for unknown user '{user_id}' in {} are ignored", path.display());
        }
        Ok(())
    }
}

/// Read and check a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::snapshot(path, format!("cannot read: {e}")))?;
    let snapshot: Snapshot = serde_json::from_str(&contents)
        .map_err(|e| Error::snapshot(path, e.to_string()))?;
    snapshot.check(path)?;

    log::debug!(
        "Loaded snapshot {}: {} works, {} OCs, {} events, {} users",
        path.display(),
        snapshot.works.len(),
        snapshot.ocs.len(),
        snapshot.events.len(),
        snapshot.users.len()
    );
    Ok(snapshot)
}

/// [`RdSource`] answering from a loaded snapshot.
pub struct SnapshotRdSource<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> SnapshotRdSource<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }
}

impl RdSource for SnapshotRdSource<'_> {
    fn users(&self) -> Result<Vec<RdUser>> {
        Ok(self.snapshot.users.clone())
    }

    fn rd(&self, user_id: &str, month: YearMonth) -> Result<Option<RdDocument>> {
        Ok(self
            .snapshot
            .rds
            .get(user_id)
            .and_then(|by_month| by_month.get(&month))
            .cloned())
    }

    fn assignments(&self, user_id: &str) -> Result<Assignments> {
        Ok(self
            .snapshot
            .assignments
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    fn operations(&self) -> Result<Vec<Operation>> {
        Ok(self.snapshot.operations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Labels;
    use crate::costs::{build_cost_report, MonthRange};
    use indoc::indoc;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SNAPSHOT: &str = indoc! {r#"
        {
          "works": [{ "id": "W1", "regional": "Sul" }],
          "ocs": [
            {
              "id": "OC1",
              "work_id": "W1",
              "description": "Concreto",
              "value": 1000.0,
              "events": [{ "id": "e9", "oc_id": "", "description": "Embedded" }]
            }
          ],
          "events": [{ "id": "e1", "oc_id": "OC1", "description": "Entrega" }],
          "users": [{ "id": "u1", "fullName": "Ana Reis" }],
          "rds": {
            "u1": {
              "2024-01": { "operation": "MELI", "invoiceData": { "value": "R$ 100,00" } },
              "2024-02": { "invoiceData": { "value": "R$ 50,00" } }
            }
          },
          "assignments": { "u1": { "2024-1": "AMAZON" } }
        }
    "#};

    fn write(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_and_query() {
        let file = write(SNAPSHOT);
        let snapshot = load_snapshot(file.path()).unwrap();
        assert_eq!(snapshot.ocs.len(), 1);

        let events = snapshot.all_events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.oc_id == "OC1"));

        let source = SnapshotRdSource::new(&snapshot);
        let jan: YearMonth = "2024-01".parse().unwrap();
        assert!(source.rd("u1", jan).unwrap().is_some());
        assert!(source.rd("u2", jan).unwrap().is_none());
    }

    #[test]
    fn test_cost_report_from_snapshot() {
        let file = write(SNAPSHOT);
        let snapshot = load_snapshot(file.path()).unwrap();
        let range = MonthRange::new("2024-01".parse().unwrap(), "2024-03".parse().unwrap())
            .unwrap();
        let run = build_cost_report(&SnapshotRdSource::new(&snapshot), &range, &Labels::default())
            .unwrap();

        assert_eq!(run.report.total(), 150.0);
        assert_eq!(run.report.category("MELI").map(|c| c.total), Some(100.0));
        // February falls back to the assignment
        assert_eq!(run.report.category("AMAZON").map(|c| c.total), Some(50.0));
    }

    #[test]
    fn test_event_listed_twice_is_returned_once() {
        let snapshot: Snapshot = serde_json::from_str(indoc! {r#"
            {
              "ocs": [
                {
                  "id": "OC1",
                  "events": [
                    { "id": "e1", "description": "Embedded copy", "status": "Pendente" },
                    { "id": "e2", "description": "Vistoria" }
                  ]
                }
              ],
              "events": [
                { "id": "e1", "oc_id": "OC1", "description": "Entrega", "status": "Concluído" }
              ]
            }
        "#})
        .unwrap();

        let events = snapshot.all_events();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2"]);
        assert_eq!(events[0].description, "Entrega");
        assert_eq!(
            crate::results::available_statuses(&events),
            vec!["Concluído".to_string()]
        );
    }

    #[test]
    fn test_duplicate_oc_is_rejected() {
        let file = write(r#"{ "ocs": [{ "id": "A" }, { "id": "A" }] }"#);
        let err = load_snapshot(file.path()).unwrap_err();
        assert!(matches!(err, Error::Snapshot { .. }));
        assert!(err.to_string().contains("duplicate OC id 'A'"));
    }

    #[test]
    fn test_malformed_json_is_a_snapshot_error() {
        let file = write("{ not json");
        assert!(matches!(
            load_snapshot(file.path()),
            Err(Error::Snapshot { .. })
        ));
    }

    #[test]
    fn test_empty_object_is_an_empty_snapshot() {
        let file = write("{}");
        assert_eq!(load_snapshot(file.path()).unwrap(), Snapshot::default());
    }
}
