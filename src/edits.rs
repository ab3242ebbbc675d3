//! Local edits to the control-tower state.
//!
//! Edits are applied optimistically before the backend confirms them, so
//! the reducer is a pure function: it returns a new state and leaves the
//! old one untouched. Persistent vectors make the copy cheap. An edit that
//! names an unknown id yields a state equal to the input.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::model::{FinancialRecord, Oc, OcEvent};

/// OCs and their events as held by the list screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlTowerState {
    pub ocs: Vector<Oc>,
    pub events: Vector<OcEvent>,
}

impl ControlTowerState {
    pub fn new(ocs: impl IntoIterator<Item = Oc>, events: impl IntoIterator<Item = OcEvent>) -> Self {
        Self {
            ocs: ocs.into_iter().collect(),
            events: events.into_iter().collect(),
        }
    }

    pub fn oc(&self, oc_id: &str) -> Option<&Oc> {
        self.ocs.iter().find(|o| o.id == oc_id)
    }

    pub fn event(&self, event_id: &str) -> Option<&OcEvent> {
        self.events.iter().find(|e| e.id == event_id)
    }

    fn oc_index(&self, oc_id: &str) -> Option<usize> {
        self.ocs.iter().position(|o| o.id == oc_id)
    }

    fn event_index(&self, event_id: &str) -> Option<usize> {
        self.events.iter().position(|e| e.id == event_id)
    }
}

/// A single editable event field with its new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum EventField {
    Description(String),
    StartDate(Option<String>),
    EndDate(Option<String>),
    Status(Option<String>),
    Protocol(Option<String>),
}

impl EventField {
    fn apply_to(&self, event: &mut OcEvent) {
        match self {
            EventField::Description(v) => event.description = v.clone(),
            EventField::StartDate(v) => event.start_date = v.clone(),
            EventField::EndDate(v) => event.end_date = v.clone(),
            EventField::Status(v) => event.status = v.clone(),
            EventField::Protocol(v) => event.protocol = v.clone(),
        }
    }
}

/// A local mutation, mirrored by a background persist call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OcEdit {
    /// Replace the OC's financial record with the same id, or append it
    UpsertFinancialRecord {
        oc_id: String,
        record: FinancialRecord,
    },
    DeleteFinancialRecord {
        oc_id: String,
        record_id: String,
    },
    /// Replace the event with the same id, or append it
    UpsertEvent { event: OcEvent },
    UpdateEventField { event_id: String, field: EventField },
    DeleteEvent { event_id: String },
    SetOcStatus {
        oc_id: String,
        status: Option<String>,
    },
    /// Replace the OC with the same id, or append it
    UpsertOc { oc: Oc },
    /// Remove an OC together with its events
    DeleteOc { oc_id: String },
}

/// Apply one edit, returning the new state.
pub fn apply_edit(state: &ControlTowerState, edit: &OcEdit) -> ControlTowerState {
    let mut next = state.clone();
    match edit {
        OcEdit::UpsertFinancialRecord { oc_id, record } => {
            update_oc(&mut next, oc_id, |oc| {
                match oc.financial_records.iter_mut().find(|r| r.id == record.id) {
                    Some(existing) => *existing = record.clone(),
                    None => oc.financial_records.push(record.clone()),
                }
            });
        }
        OcEdit::DeleteFinancialRecord { oc_id, record_id } => {
            update_oc(&mut next, oc_id, |oc| {
                oc.financial_records.retain(|r| &r.id != record_id);
            });
        }
        OcEdit::UpsertEvent { event } => match next.event_index(&event.id) {
            Some(idx) => {
                next.events.set(idx, event.clone());
            }
            None => next.events.push_back(event.clone()),
        },
        OcEdit::UpdateEventField { event_id, field } => {
            if let Some(idx) = next.event_index(event_id) {
                let mut event = next.events[idx].clone();
                field.apply_to(&mut event);
                next.events.set(idx, event);
            }
        }
        OcEdit::DeleteEvent { event_id } => {
            if let Some(idx) = next.event_index(event_id) {
                next.events.remove(idx);
            }
        }
        OcEdit::SetOcStatus { oc_id, status } => {
            update_oc(&mut next, oc_id, |oc| oc.status = status.clone());
        }
        OcEdit::UpsertOc { oc } => match next.oc_index(&oc.id) {
            Some(idx) => {
                next.ocs.set(idx, oc.clone());
            }
            None => next.ocs.push_back(oc.clone()),
        },
        OcEdit::DeleteOc { oc_id } => {
            if let Some(idx) = next.oc_index(oc_id) {
                next.ocs.remove(idx);
                next.events.retain(|e| &e.oc_id != oc_id);
            }
        }
    }
    next
}

/// Apply edits in order.
pub fn apply_edits<'e>(
    state: &ControlTowerState,
    edits: impl IntoIterator<Item = &'e OcEdit>,
) -> ControlTowerState {
    edits
        .into_iter()
        .fold(state.clone(), |acc, edit| apply_edit(&acc, edit))
}

fn update_oc(state: &mut ControlTowerState, oc_id: &str, f: impl FnOnce(&mut Oc)) {
    if let Some(idx) = state.oc_index(oc_id) {
        let mut oc = state.ocs[idx].clone();
        f(&mut oc);
        state.ocs.set(idx, oc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state() -> ControlTowerState {
        ControlTowerState::new(
            vec![
                Oc {
                    id: "A".into(),
                    financial_records: vec![FinancialRecord {
                        id: "f1".into(),
                        value: Some(100.0),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
                Oc {
                    id: "B".into(),
                    ..Default::default()
                },
            ],
            vec![
                OcEvent {
                    id: "e1".into(),
                    oc_id: "A".into(),
                    ..Default::default()
                },
                OcEvent {
                    id: "e2".into(),
                    oc_id: "B".into(),
                    ..Default::default()
                },
            ],
        )
    }

    #[test]
    fn test_upsert_financial_record_replaces_then_appends() {
        let before = state();
        let replaced = apply_edit(
            &before,
            &OcEdit::UpsertFinancialRecord {
                oc_id: "A".into(),
                record: FinancialRecord {
                    id: "f1".into(),
                    value: Some(150.0),
                    ..Default::default()
                },
            },
        );
        assert_eq!(replaced.oc("A").unwrap().consumed(), 150.0);
        assert_eq!(replaced.oc("A").unwrap().financial_records.len(), 1);

        let appended = apply_edit(
            &replaced,
            &OcEdit::UpsertFinancialRecord {
                oc_id: "A".into(),
                record: FinancialRecord {
                    id: "f2".into(),
                    value: Some(50.0),
                    ..Default::default()
                },
            },
        );
        assert_eq!(appended.oc("A").unwrap().consumed(), 200.0);
        // the input state is untouched
        assert_eq!(before.oc("A").unwrap().consumed(), 100.0);
    }

    #[test]
    fn test_delete_financial_record() {
        let next = apply_edit(
            &state(),
            &OcEdit::DeleteFinancialRecord {
                oc_id: "A".into(),
                record_id: "f1".into(),
            },
        );
        assert!(next.oc("A").unwrap().financial_records.is_empty());
    }

    #[test]
    fn test_event_edits() {
        let s = state();
        let s = apply_edit(
            &s,
            &OcEdit::UpdateEventField {
                event_id: "e1".into(),
                field: EventField::Status(Some("Concluído".into())),
            },
        );
        assert_eq!(s.event("e1").unwrap().status.as_deref(), Some("Concluído"));

        let s = apply_edit(
            &s,
            &OcEdit::UpsertEvent {
                event: OcEvent {
                    id: "e3".into(),
                    oc_id: "B".into(),
                    ..Default::default()
                },
            },
        );
        assert_eq!(s.events.len(), 3);

        let s = apply_edit(&s, &OcEdit::DeleteEvent { event_id: "e2".into() });
        let ids: Vec<&str> = s.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e3"]);
    }

    #[test]
    fn test_delete_oc_drops_its_events() {
        let next = apply_edit(&state(), &OcEdit::DeleteOc { oc_id: "A".into() });
        assert!(next.oc("A").is_none());
        assert_eq!(next.events.len(), 1);
        assert_eq!(next.events[0].oc_id, "B");
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let before = state();
        for edit in [
            OcEdit::DeleteOc { oc_id: "Z".into() },
            OcEdit::DeleteEvent { event_id: "Z".into() },
            OcEdit::SetOcStatus {
                oc_id: "Z".into(),
                status: Some("x".into()),
            },
            OcEdit::UpdateEventField {
                event_id: "Z".into(),
                field: EventField::Description("x".into()),
            },
            OcEdit::DeleteFinancialRecord {
                oc_id: "A".into(),
                record_id: "Z".into(),
            },
        ] {
            assert_eq!(apply_edit(&before, &edit), before, "{edit:?}");
        }
    }

    #[test]
    fn test_apply_edits_in_order() {
        let edits = vec![
            OcEdit::UpsertOc {
                oc: Oc {
                    id: "C".into(),
                    ..Default::default()
                },
            },
            OcEdit::SetOcStatus {
                oc_id: "C".into(),
                status: Some("Aprovado".into()),
            },
        ];
        let next = apply_edits(&state(), &edits);
        assert_eq!(next.oc("C").unwrap().status.as_deref(), Some("Aprovado"));
        assert_eq!(next.ocs.len(), 3);
    }

    #[test]
    fn test_edit_wire_format() {
        let edit: OcEdit = serde_json::from_str(
            r#"{"kind":"update_event_field","event_id":"e1","field":{"field":"end_date","value":"2024-02-01"}}"#,
        )
        .unwrap();
        assert_eq!(
            edit,
            OcEdit::UpdateEventField {
                event_id: "e1".into(),
                field: EventField::EndDate(Some("2024-02-01".into())),
            }
        );
    }
}
