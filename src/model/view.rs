//! Field accessors joining records with their lookups and children.
//!
//! The list screens filter the same way but on different shapes, so the
//! engines never touch fields directly. A [`RecordView`] answers two
//! questions about a record: what text does it search against, and which
//! child records belong to it.

use std::collections::HashMap;

use super::{ChildRecord, Oc, OcEvent, Record, Work};

/// Joined, read-only view over a record collection.
pub trait RecordView<R> {
    type Child: ChildRecord;

    /// Concatenation of the record's own searchable fields, including
    /// resolved lookup fields.
    fn search_text(&self, record: &R) -> String;

    /// Children whose foreign key equals the record's id.
    fn children(&self, record: &R) -> &[&Self::Child];
}

/// A [`RecordView`] built from accessor functions.
///
/// Children are indexed by parent id once at construction, so each
/// lookup during a filter pass is a hash probe instead of a scan.
pub struct IndexedView<'a, R, C> {
    children: HashMap<&'a str, Vec<&'a C>>,
    search: Box<dyn Fn(&R) -> String + 'a>,
}

impl<'a, R, C> IndexedView<'a, R, C> {
    pub fn new<P, S>(children: impl IntoIterator<Item = &'a C>, parent_of: P, search: S) -> Self
    where
        P: Fn(&'a C) -> &'a str,
        S: Fn(&R) -> String + 'a,
    {
        let mut index: HashMap<&'a str, Vec<&'a C>> = HashMap::new();
        for child in children {
            index.entry(parent_of(child)).or_default().push(child);
        }

        Self {
            children: index,
            search: Box::new(search),
        }
    }

    /// Number of distinct parents that own at least one child.
    pub fn parent_count(&self) -> usize {
        self.children.len()
    }
}

impl<R: Record, C: ChildRecord> RecordView<R> for IndexedView<'_, R, C> {
    type Child = C;

    fn search_text(&self, record: &R) -> String {
        (self.search)(record)
    }

    fn children(&self, record: &R) -> &[&C] {
        self.children
            .get(record.id())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// View over OCs joined with their works and events.
///
/// The search text is `description type work.id work.regional`.
pub fn oc_view<'a>(works: &'a [Work], events: &'a [OcEvent]) -> IndexedView<'a, Oc, OcEvent> {
    let works_by_id: HashMap<&'a str, &'a Work> =
        works.iter().map(|w| (w.id.as_str(), w)).collect();

    IndexedView::new(
        events,
        |evt: &'a OcEvent| evt.oc_id.as_str(),
        move |oc: &Oc| {
            let work = works_by_id.get(oc.work_id.as_str());
            format!(
                "{} {} {} {}",
                oc.description,
                oc.kind,
                work.map(|w| w.id.as_str()).unwrap_or_default(),
                work.and_then(|w| w.regional.as_deref()).unwrap_or_default(),
            )
        },
    )
}
