//! Filter functionality for list records.
//!
//! A record survives a filter pass only if it satisfies every active
//! predicate. The text predicate matches "deep": a record whose own fields
//! do not contain the query still matches when any of its children's
//! descriptions does.

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::config::{DeadlineConfig, NearDeadlinePolicy, DEFAULT_NEAR_DEADLINE_PCT};
use crate::dates;
use crate::model::{ChildRecord, RecordView};

/// Snapshot of the active predicates.
///
/// Produced by the presentation layer and read-only here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterState {
    /// Case-insensitive free-text query. Blank means inactive.
    pub query: String,
    /// Keep only records with at least one overdue child.
    pub overdue: bool,
    /// Keep only records with at least one child past the near-deadline threshold.
    pub near_deadline: bool,
    /// Keep only records with a child whose status equals this value exactly.
    pub status: Option<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_overdue(mut self, on: bool) -> Self {
        self.overdue = on;
        self
    }

    pub fn with_near_deadline(mut self, on: bool) -> Self {
        self.near_deadline = on;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Active predicates, in evaluation order.
    pub fn active_filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();
        let query = self.query.trim();
        if !query.is_empty() {
            filters.push(Filter::Text(query.to_lowercase()));
        }
        if self.overdue {
            filters.push(Filter::Overdue);
        }
        if self.near_deadline {
            filters.push(Filter::NearDeadline);
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            filters.push(Filter::Status(status.to_string()));
        }
        filters
    }

    /// True when at least one predicate would narrow the result.
    pub fn is_active(&self) -> bool {
        !self.active_filters().is_empty()
    }
}

/// A single predicate over a record and its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Lower-cased needle matched against the record or any child description
    Text(String),
    /// At least one child is overdue
    Overdue,
    /// At least one child is at or past the near-deadline threshold
    NearDeadline,
    /// At least one child has exactly this status
    Status(String),
}

impl Filter {
    /// Check if a record matches this filter
    pub fn matches<R, V>(&self, record: &R, view: &V, rules: &DeadlineRules) -> bool
    where
        V: RecordView<R>,
    {
        let children = view.children(record);
        match self {
            Filter::Text(needle) => {
                view.search_text(record).to_lowercase().contains(needle.as_str())
                    || children
                        .iter()
                        .any(|c| c.description().to_lowercase().contains(needle.as_str()))
            }
            Filter::Overdue => children.iter().any(|c| rules.is_overdue(*c)),
            Filter::NearDeadline => children.iter().any(|c| rules.is_near_deadline(*c)),
            Filter::Status(status) => children
                .iter()
                .any(|c| c.status() == Some(status.as_str())),
        }
    }

    /// Get display name for filter
    pub fn display_name(&self) -> String {
        match self {
            Filter::Text(needle) => format!("Search: \"{}\"", needle),
            Filter::Overdue => "Overdue".to_string(),
            Filter::NearDeadline => "Near deadline".to_string(),
            Filter::Status(status) => format!("Status: {}", status),
        }
    }
}

/// Deadline predicates evaluated against a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadlineRules {
    pub now: DateTime<Utc>,
    pub near_deadline_pct: f64,
    pub policy: NearDeadlinePolicy,
}

impl DeadlineRules {
    /// Default threshold and policy at the given instant.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            near_deadline_pct: DEFAULT_NEAR_DEADLINE_PCT,
            policy: NearDeadlinePolicy::default(),
        }
    }

    pub fn from_config(config: &DeadlineConfig, clock: &dyn Clock) -> Self {
        Self {
            now: clock.now(),
            near_deadline_pct: config.near_deadline_pct,
            policy: config.near_deadline_policy,
        }
    }

    pub fn with_policy(mut self, policy: NearDeadlinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn is_overdue<C: ChildRecord + ?Sized>(&self, child: &C) -> bool {
        dates::is_overdue(child.end_date(), self.now)
    }

    pub fn is_near_deadline<C: ChildRecord + ?Sized>(&self, child: &C) -> bool {
        let pct = dates::elapsed_percentage(child.start_date(), child.end_date(), self.now);
        let past_threshold = pct >= self.near_deadline_pct;
        match self.policy {
            NearDeadlinePolicy::IncludeOverdue => past_threshold,
            NearDeadlinePolicy::ExcludeOverdue => past_threshold && !self.is_overdue(child),
        }
    }
}

/// Keep the records that satisfy every active predicate, in input order.
pub fn filter_records<'r, R, V>(
    records: impl IntoIterator<Item = &'r R>,
    view: &V,
    state: &FilterState,
    rules: &DeadlineRules,
) -> Vec<&'r R>
where
    R: 'r,
    V: RecordView<R>,
{
    let filters = state.active_filters();
    records
        .into_iter()
        .filter(|record| filters.iter().all(|f| f.matches(*record, view, rules)))
        .collect()
}

/// Distinct non-empty child statuses in first-seen order.
///
/// These are the options offered by the status selector.
pub fn available_statuses<'c, C>(children: impl IntoIterator<Item = &'c C>) -> Vec<String>
where
    C: ChildRecord + 'c,
{
    let mut seen = std::collections::HashSet::new();
    children
        .into_iter()
        .filter_map(|c| c.status())
        .filter(|s| seen.insert(s.to_string()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{oc_view, Oc, OcEvent, Work};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()
    }

    fn oc(id: &str, work: &str, description: &str) -> Oc {
        Oc {
            id: id.into(),
            work_id: work.into(),
            kind: "Obras".into(),
            description: description.into(),
            ..Default::default()
        }
    }

    fn event(oc_id: &str, description: &str, start: &str, end: &str, status: &str) -> OcEvent {
        OcEvent {
            id: format!("{oc_id}-{description}"),
            oc_id: oc_id.into(),
            description: description.into(),
            start_date: Some(start.into()),
            end_date: Some(end.into()),
            status: Some(status.into()),
            ..Default::default()
        }
    }

    fn ids(records: &[&Oc]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    fn fixture() -> (Vec<Oc>, Vec<Work>, Vec<OcEvent>) {
        let ocs = vec![
            oc("A", "W1", "Cabeamento estruturado"),
            oc("B", "W2", "Pintura fachada"),
            oc("C", "", "Laudo elétrico"),
        ];
        let works = vec![Work {
            id: "W2".into(),
            regional: Some("Nordeste".into()),
            address: None,
        }];
        let events = vec![
            // overdue
            event("A", "Entrega de cabos", "2023-12-01", "2024-01-05", "Aguardando"),
            // 90% elapsed, not overdue
            event("B", "Aprovação orçamento", "2024-01-01", "2024-01-11", "Aprovado"),
            // 10% elapsed
            event("C", "Vistoria técnica", "2024-01-09", "2024-01-19", "Aguardando"),
        ];
        (ocs, works, events)
    }

    #[test]
    fn test_empty_state_keeps_everything() {
        let (ocs, works, events) = fixture();
        let view = oc_view(&works, &events);
        let out = filter_records(&ocs, &view, &FilterState::new(), &DeadlineRules::at(now()));
        assert_eq!(ids(&out), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_text_matches_own_fields_case_insensitive() {
        let (ocs, works, events) = fixture();
        let view = oc_view(&works, &events);
        let state = FilterState::new().with_query("PINTURA");
        let out = filter_records(&ocs, &view, &state, &DeadlineRules::at(now()));
        assert_eq!(ids(&out), vec!["B"]);
    }

    #[test]
    fn test_text_matches_joined_work_fields() {
        let (ocs, works, events) = fixture();
        let view = oc_view(&works, &events);
        let state = FilterState::new().with_query("nordeste");
        let out = filter_records(&ocs, &view, &state, &DeadlineRules::at(now()));
        assert_eq!(ids(&out), vec!["B"]);
    }

    #[test]
    fn test_text_deep_match_through_child() {
        let (ocs, works, events) = fixture();
        let view = oc_view(&works, &events);
        // "vistoria" only appears in C's event description
        let state = FilterState::new().with_query("vistoria");
        let out = filter_records(&ocs, &view, &state, &DeadlineRules::at(now()));
        assert_eq!(ids(&out), vec!["C"]);
    }

    #[test]
    fn test_blank_query_is_inactive() {
        let state = FilterState::new().with_query("   ");
        assert!(!state.is_active());
    }

    #[test]
    fn test_overdue_toggle() {
        let (ocs, works, events) = fixture();
        let view = oc_view(&works, &events);
        let state = FilterState::new().with_overdue(true);
        let out = filter_records(&ocs, &view, &state, &DeadlineRules::at(now()));
        assert_eq!(ids(&out), vec!["A"]);
    }

    #[test]
    fn test_near_deadline_includes_overdue_by_default() {
        let (ocs, works, events) = fixture();
        let view = oc_view(&works, &events);
        let state = FilterState::new().with_near_deadline(true);
        let out = filter_records(&ocs, &view, &state, &DeadlineRules::at(now()));
        assert_eq!(ids(&out), vec!["A", "B"]);
    }

    #[test]
    fn test_near_deadline_exclude_overdue_policy() {
        let (ocs, works, events) = fixture();
        let view = oc_view(&works, &events);
        let state = FilterState::new().with_near_deadline(true);
        let rules = DeadlineRules::at(now()).with_policy(NearDeadlinePolicy::ExcludeOverdue);
        let out = filter_records(&ocs, &view, &state, &rules);
        assert_eq!(ids(&out), vec!["B"]);
    }

    #[test]
    fn test_near_deadline_threshold_is_inclusive() {
        let ocs = vec![oc("X", "W", "x")];
        // exactly 50% elapsed at `now`
        let events = vec![event("X", "e", "2024-01-05", "2024-01-15", "s")];
        let view = oc_view(&[], &events);
        let state = FilterState::new().with_near_deadline(true);
        let out = filter_records(&ocs, &view, &state, &DeadlineRules::at(now()));
        assert_eq!(ids(&out), vec!["X"]);
    }

    #[test]
    fn test_status_is_exact_match() {
        let (ocs, works, events) = fixture();
        let view = oc_view(&works, &events);
        let rules = DeadlineRules::at(now());

        let exact = FilterState::new().with_status("Aguardando");
        assert_eq!(ids(&filter_records(&ocs, &view, &exact, &rules)), vec!["A", "C"]);

        let partial = FilterState::new().with_status("Aguard");
        assert!(filter_records(&ocs, &view, &partial, &rules).is_empty());

        let wrong_case = FilterState::new().with_status("aguardando");
        assert!(filter_records(&ocs, &view, &wrong_case, &rules).is_empty());
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let (ocs, works, events) = fixture();
        let view = oc_view(&works, &events);
        let state = FilterState::new()
            .with_status("Aguardando")
            .with_overdue(true);
        let out = filter_records(&ocs, &view, &state, &DeadlineRules::at(now()));
        assert_eq!(ids(&out), vec!["A"]);
    }

    #[test]
    fn test_records_without_children_fail_child_predicates() {
        let ocs = vec![oc("Z", "W", "sem eventos")];
        let view = oc_view(&[], &[]);
        let rules = DeadlineRules::at(now());
        for state in [
            FilterState::new().with_overdue(true),
            FilterState::new().with_near_deadline(true),
            FilterState::new().with_status("Aprovado"),
        ] {
            assert!(filter_records(&ocs, &view, &state, &rules).is_empty());
        }
    }

    #[test]
    fn test_available_statuses_first_seen_distinct() {
        let (_, _, mut events) = fixture();
        events.push(OcEvent {
            id: "blank".into(),
            oc_id: "A".into(),
            status: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(available_statuses(&events), vec!["Aguardando", "Aprovado"]);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Filter::Overdue.display_name(), "Overdue");
        assert_eq!(
            Filter::Status("Aprovado".into()).display_name(),
            "Status: Aprovado"
        );
    }
}
