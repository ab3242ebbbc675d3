//! Cost reports over monthly RDs.
//!
//! The pipeline runs in three steps: enumerate the months of a range, read
//! every (user, month) RD in one fail-soft batch, then flatten and roll the
//! entries up by category and sub-category. The compiled hours matrix reads
//! the same RDs and credits worked minutes to cost centers instead.

pub mod aggregate;
pub mod currency;
pub mod fetch;
pub mod hours;
pub mod months;
pub mod rd;

pub use aggregate::{
    aggregate_costs, flatten_report, CategoryBucket, CostEntry, CostReport, EntryKind,
    RankedItem, Scope,
};
pub use currency::{format_brl, parse_brl, MoneyValue};
pub use fetch::{build_cost_report, fetch_batch, CostRun, FetchBatch, FetchedRd, RdSource};
pub use hours::{
    compile_hours, format_minutes, load_hours, CatalogRow, HoursMatrix, Operation,
    OperationsCatalog, SubOperation, UserColumn, UserRds,
};
pub use months::{MonthRange, YearMonth};
pub use rd::{Assignments, InvoiceData, RdDocument, RdUser, Refund, SubOperationRef};
