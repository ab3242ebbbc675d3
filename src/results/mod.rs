//! Filter, group, sort and paginate list records.
//!
//! Every engine here is a pure function over borrowed records: nothing is
//! mutated, and rerunning with the same inputs yields the same output. The
//! presentation layer owns the state values ([`FilterState`],
//! [`PaginationState`], [`ViewSelector`]) and calls [`render_view`] on each
//! change.
//!
//! # Examples
//!
//! ```
//! use canteiro::model::{oc_view, Oc};
//! use canteiro::results::{filter_records, paginate, DeadlineRules, FilterState};
//! use chrono::Utc;
//!
//! let ocs = vec![Oc { id: "1".into(), description: "Pintura".into(), ..Default::default() }];
//! let view = oc_view(&[], &[]);
//! let state = FilterState::new().with_query("pint");
//! let hits = filter_records(&ocs, &view, &state, &DeadlineRules::at(Utc::now()));
//! let page = paginate(&hits, 1, 20);
//! assert_eq!(page.items.len(), 1);
//! ```

pub mod filter;
pub mod grouping;
pub mod kanban;
pub mod pagination;
pub mod rollup;
pub mod sort;
pub mod timeline;
pub mod view_mode;

pub use filter::{available_statuses, filter_records, DeadlineRules, Filter, FilterState};
pub use grouping::{group_by_parent, group_records, summarize, Group, GroupSummary};
pub use kanban::{build_board, Board, KanbanColumns};
pub use pagination::{paginate, total_pages, Fingerprint, Page, PaginationState};
pub use rollup::{BudgetBand, BudgetRollup};
pub use sort::{sort_records, SortCriteria, SortFields};
pub use timeline::{build_timeline, EmptyTimeline, Timeline, TimelineBar, TimelineOutcome};
pub use view_mode::{render_view, ViewMode, ViewOutput, ViewRequest, ViewSelector};
