//! Page windows over ordered collections, and the page cursor that resets
//! whenever the upstream collection changes.
//!
//! Pages are one-based. Requests outside `[1, total_pages]` are clamped to
//! the nearest valid page, so `paginate` never fails and never returns a
//! window past the end of the data.

use xxhash_rust::xxh64::Xxh64;

use crate::config::DEFAULT_ITEMS_PER_PAGE;
use crate::model::Record;

/// One window over a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// One-based page actually served after clamping
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// `max(1, ceil(len / per_page))`, treating a zero page size as 1.
pub fn total_pages(len: usize, items_per_page: usize) -> usize {
    len.div_ceil(items_per_page.max(1)).max(1)
}

/// Clamp a requested page to `[1, total_pages]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slice out one page, clamping an out-of-range request.
pub fn paginate<T: Clone>(items: &[T], page: usize, items_per_page: usize) -> Page<T> {
    let per_page = items_per_page.max(1);
    let total_pages = total_pages(items.len(), per_page);
    let current_page = clamp_page(page, total_pages);

    let start = (current_page - 1) * per_page;
    let end = (start + per_page).min(items.len());
    let window = items.get(start..end).unwrap_or(&[]);

    Page {
        items: window.to_vec(),
        current_page,
        total_pages,
        total_items: items.len(),
    }
}

/// Identity of a collection: its length plus a hash of its ids in order.
///
/// Two collections with the same fingerprint are treated as the same
/// listing for page-reset purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub len: usize,
    pub hash: u64,
}

impl Fingerprint {
    pub fn of<'r, R: Record + 'r>(records: impl IntoIterator<Item = &'r R>) -> Self {
        let mut hasher = Xxh64::new(0);
        let mut len = 0;
        for record in records {
            hasher.update(record.id().as_bytes());
            // separator so ["ab","c"] and ["a","bc"] differ
            hasher.update(&[0xffu8]);
            len += 1;
        }
        Self {
            len,
            hash: hasher.digest(),
        }
    }
}

/// Page cursor owned by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    current_page: usize,
    items_per_page: usize,
    fingerprint: Option<Fingerprint>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl PaginationState {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
            fingerprint: None,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Move to `page`. Clamping happens when the page is served.
    pub fn go_to(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    pub fn next(&mut self) {
        self.current_page = self.current_page.saturating_add(1);
    }

    pub fn previous(&mut self) {
        self.current_page = self.current_page.saturating_sub(1).max(1);
    }

    /// Change the page size. Always returns to page 1.
    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.max(1);
        self.reset();
    }

    /// Any filter change returns to page 1.
    pub fn on_filter_change(&mut self) {
        self.reset();
    }

    /// Record the current upstream collection, returning to page 1 when it
    /// differs from the last one seen. Returns true if a reset happened.
    pub fn sync(&mut self, fingerprint: Fingerprint) -> bool {
        let changed = self
            .fingerprint
            .is_some_and(|previous| previous != fingerprint);
        self.fingerprint = Some(fingerprint);
        if changed {
            self.reset();
        }
        changed
    }

    /// Serve the current page of `items`, syncing on their fingerprint first.
    pub fn page_of<'r, R: Record>(&mut self, items: &[&'r R]) -> Page<&'r R> {
        self.sync(Fingerprint::of(items.iter().copied()));
        let page = paginate(items, self.current_page, self.items_per_page);
        self.current_page = page.current_page;
        page
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }
}
