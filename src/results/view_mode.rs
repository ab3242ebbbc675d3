//! View modes and the pipeline each one runs.
//!
//! Exactly one mode is active at a time. The mode decides which engines run
//! after filtering and sorting:
//!
//! | mode       | after filter + sort         |
//! |------------|-----------------------------|
//! | `List`     | paginate                    |
//! | `Grouped`  | group by parent key         |
//! | `Kanban`   | partition by status         |
//! | `Timeline` | lay children out on an axis |

use serde::{Deserialize, Serialize};

use super::filter::{filter_records, DeadlineRules, FilterState};
use super::grouping::{group_by_parent, Group};
use super::kanban::{build_board, Board, KanbanColumns};
use super::pagination::{paginate, Page};
use super::sort::{sort_records, SortCriteria, SortFields};
use super::timeline::{build_timeline, TimelineOutcome};
use crate::config::{CanteiroConfig, Labels, TimelineConfig};
use crate::model::RecordView;

/// View mode for a list screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Flat, paginated list.
    #[default]
    List,
    /// Records grouped by their parent work.
    Grouped,
    /// Status columns.
    Kanban,
    /// Child records on a shared date axis.
    Timeline,
}

impl ViewMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            ViewMode::List => "List",
            ViewMode::Grouped => "Grouped",
            ViewMode::Kanban => "Kanban",
            ViewMode::Timeline => "Timeline",
        }
    }

    /// Only the list view paginates.
    pub fn is_paginated(&self) -> bool {
        matches!(self, ViewMode::List)
    }
}

/// Holder of the single active view mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewSelector {
    mode: ViewMode,
}

impl ViewSelector {
    pub fn new(mode: ViewMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Activate `mode`, deactivating the previous one.
    ///
    /// Returns true when the mode actually changed, which callers treat
    /// like a filter change for pagination purposes.
    pub fn select(&mut self, mode: ViewMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }
}

/// Everything a render pass needs besides the data.
#[derive(Debug, Clone)]
pub struct ViewRequest {
    pub mode: ViewMode,
    pub filter: FilterState,
    pub rules: DeadlineRules,
    pub sort: SortCriteria,
    pub page: usize,
    pub items_per_page: usize,
    pub kanban_columns: KanbanColumns,
    pub timeline: TimelineConfig,
    pub labels: Labels,
}

impl ViewRequest {
    /// A first-page request using the configured page size, labels and axis.
    pub fn from_config(mode: ViewMode, rules: DeadlineRules, config: &CanteiroConfig) -> Self {
        Self {
            mode,
            filter: FilterState::default(),
            rules,
            sort: SortCriteria::default(),
            page: 1,
            items_per_page: config.pagination.items_per_page,
            kanban_columns: KanbanColumns::default(),
            timeline: config.timeline.clone(),
            labels: config.labels.clone(),
        }
    }
}

/// Result of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutput<'v, R, C> {
    List(Page<&'v R>),
    Grouped(Vec<Group<'v, R>>),
    Kanban(Board<'v, R>),
    Timeline(TimelineOutcome<'v, C>),
}

impl<R, C> ViewOutput<'_, R, C> {
    /// True when there is nothing to show, which is a display state and
    /// not an error.
    pub fn is_empty(&self) -> bool {
        match self {
            ViewOutput::List(page) => page.is_empty(),
            ViewOutput::Grouped(groups) => groups.is_empty(),
            ViewOutput::Kanban(board) => board.is_empty(),
            ViewOutput::Timeline(outcome) => matches!(outcome, TimelineOutcome::Empty(_)),
        }
    }
}

/// Run filter, sort and the mode-specific engine.
pub fn render_view<'v, R, V>(
    records: impl IntoIterator<Item = &'v R>,
    view: &'v V,
    request: &ViewRequest,
) -> ViewOutput<'v, R, V::Child>
where
    R: SortFields + 'v,
    V: RecordView<R>,
{
    let mut filtered = filter_records(records, view, &request.filter, &request.rules);
    sort_records(&mut filtered, request.sort);
    log::debug!(
        "Rendering {} view over {} records",
        request.mode.display_name(),
        filtered.len()
    );

    match request.mode {
        ViewMode::List => {
            ViewOutput::List(paginate(&filtered, request.page, request.items_per_page))
        }
        ViewMode::Grouped => {
            ViewOutput::Grouped(group_by_parent(filtered, &request.labels.no_parent))
        }
        ViewMode::Kanban => ViewOutput::Kanban(build_board(
            filtered,
            &request.kanban_columns,
            &request.labels.default_status,
        )),
        ViewMode::Timeline => {
            let children = filtered
                .iter()
                .flat_map(move |record| view.children(record).iter().copied());
            ViewOutput::Timeline(build_timeline(children, &request.timeline))
        }
    }
}
