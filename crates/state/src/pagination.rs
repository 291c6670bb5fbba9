//! Client-side pagination over an already-hydrated result set.

use std::ops::Range;

/// Dogs shown per page
pub const PAGE_SIZE: usize = 20;

/// Tracks the current page of a result set of known size.
///
/// Pages are 1-based. The current page always lies in
/// `[1, max(total_pages, 1)]`, so an empty result set still has a page 1
/// (which is simply empty).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
    total_items: usize,
}

impl Pager {
    /// A pager over `total_items`, positioned on page 1.
    ///
    /// A `page_size` of zero is treated as one.
    pub fn new(page_size: usize, total_items: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total_items,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// `ceil(total_items / page_size)`; zero for an empty set
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    fn last_page(&self) -> usize {
        self.total_pages().max(1)
    }

    /// Point at a new result set and go back to page 1
    pub fn reset(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.page = 1;
    }

    /// Advance one page. No-op on the last page; returns whether it moved.
    pub fn next(&mut self) -> bool {
        if self.page < self.last_page() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. No-op on page 1; returns whether it moved.
    pub fn prev(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`, clamped into `[1, max(total_pages, 1)]`.
    /// Returns the page actually selected.
    pub fn go_to(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.last_page());
        self.page
    }

    /// Index range of the current page, `[(p-1)*size, p*size)` cut to the set
    pub fn range(&self) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    /// The current page's slice of `items`
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        &items[start..end]
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(PAGE_SIZE, 0)
    }
}
