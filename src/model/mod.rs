//! Record types shared by the pipeline.
//!
//! The concrete types mirror the purchase-order ("OC") documents served by
//! the back office: an [`Oc`] belongs to a construction [`Work`] and owns
//! dated [`OcEvent`]s and [`FinancialRecord`]s. The engines themselves are
//! written against the [`Record`] and [`ChildRecord`] traits plus a
//! [`RecordView`] that supplies joined fields, so other list screens can
//! reuse them with their own types.

pub mod records;
pub mod view;

pub use records::{Address, FinancialRecord, Oc, OcEvent, Work};
pub use view::{oc_view, IndexedView, RecordView};

/// A top-level list item.
pub trait Record {
    /// Unique identifier within a collection.
    fn id(&self) -> &str;

    /// Grouping key (e.g. the work id). `None` or empty falls back to a
    /// designated bucket.
    fn parent_key(&self) -> Option<&str>;

    /// Workflow status used by kanban columns.
    fn status(&self) -> Option<&str>;
}

/// A dated sub-item attached to exactly one [`Record`].
pub trait ChildRecord {
    fn description(&self) -> &str;
    fn start_date(&self) -> Option<&str>;
    fn end_date(&self) -> Option<&str>;
    fn status(&self) -> Option<&str>;
}

/// Treat `Some("")` the same as a missing value.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
