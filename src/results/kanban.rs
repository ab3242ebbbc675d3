//! Kanban partitioning by record status.

use super::grouping::{group_records, Group};
use crate::model::Record;

/// How the board's columns are chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KanbanColumns {
    /// One column per distinct status observed, in first-seen order
    #[default]
    Dynamic,
    /// A fixed column list. Records with other statuses go to
    /// [`Board::unassigned`].
    Fixed(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board<'r, R> {
    pub columns: Vec<Group<'r, R>>,
    pub unassigned: Vec<&'r R>,
}

impl<R> Board<'_, R> {
    /// Total records across every column and the unassigned lane.
    pub fn record_count(&self) -> usize {
        self.columns.iter().map(Group::len).sum::<usize>() + self.unassigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

/// Partition records into status columns.
///
/// A missing or blank status is read as `default_status`.
pub fn build_board<'r, R: Record + 'r>(
    records: impl IntoIterator<Item = &'r R>,
    columns: &KanbanColumns,
    default_status: &str,
) -> Board<'r, R> {
    let dynamic = group_records(records, |r| r.status(), default_status);

    match columns {
        KanbanColumns::Dynamic => Board {
            columns: dynamic,
            unassigned: Vec::new(),
        },
        KanbanColumns::Fixed(names) => {
            let mut fixed: Vec<Group<'r, R>> = names
                .iter()
                .map(|name| Group {
                    key: name.clone(),
                    records: Vec::new(),
                })
                .collect();
            let mut unassigned = Vec::new();

            for group in dynamic {
                match fixed.iter_mut().find(|col| col.key == group.key) {
                    Some(col) => col.records.extend(group.records),
                    None => unassigned.extend(group.records),
                }
            }

            Board {
                columns: fixed,
                unassigned,
            }
        }
    }
}
