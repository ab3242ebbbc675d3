//! Filter, group and paginate purchase orders, and aggregate monthly costs,
//! for a construction back office.
//!
//! The library is the pipeline; the `canteiro` binary is a thin front end
//! over it.

// Export modules for library usage
pub mod alerts;
pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod costs;
pub mod dates;
pub mod edits;
pub mod errors;
pub mod formatting;
pub mod io;
pub mod model;
pub mod results;

// Re-export commonly used types
pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::config::CanteiroConfig;
pub use crate::costs::{build_cost_report, CostReport, MonthRange, RdSource, YearMonth};
pub use crate::errors::{Error, Result};
pub use crate::model::{oc_view, Oc, OcEvent, Record, RecordView, Work};
pub use crate::results::{
    filter_records, paginate, render_view, DeadlineRules, FilterState, ViewMode, ViewOutput,
    ViewRequest,
};
