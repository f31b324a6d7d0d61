//! Page arithmetic for the card grid
//!
//! Pages are 1-indexed. There is always at least one page, even when the
//! collection is empty.

use crate::config::DEFAULT_PAGE_SIZE;

/// Number of pages needed for `count` items, never less than 1
pub fn total_pages(count: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    count.div_ceil(page_size).max(1)
}

/// Slice of `items` shown on 1-indexed `page`
///
/// Page 0 is treated as page 1; pages past the end are empty.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Current-page cursor with clamped navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current: usize,
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    /// Start on page 1
    pub fn new(page_size: usize) -> Self {
        Self {
            current: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Total pages for a collection of `count` items
    pub fn total_pages(&self, count: usize) -> usize {
        total_pages(count, self.page_size)
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self, count: usize) -> bool {
        self.current < self.total_pages(count)
    }

    /// Go back one page; returns false at page 1
    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Go forward one page; returns false on the last page
    pub fn next(&mut self, count: usize) -> bool {
        if !self.has_next(count) {
            return false;
        }
        self.current += 1;
        true
    }

    /// Pull the current page back into range after the collection shrank
    pub fn clamp(&mut self, count: usize) {
        self.current = self.current.clamp(1, self.total_pages(count));
    }

    /// Items on the current page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        page_slice(items, self.current, self.page_size)
    }

    /// "page / total" indicator text
    pub fn indicator(&self, count: usize) -> String {
        format!("{} / {}", self.current, self.total_pages(count))
    }
}
