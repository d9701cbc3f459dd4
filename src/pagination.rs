use serde::Serialize;
use std::num::NonZeroUsize;

/// Current page over a derived view. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: NonZeroUsize,
    current_page: usize,
}

/// One page of a derived view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl Paginator {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            page_size,
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Never less than one, even for an empty collection.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size.get()).max(1)
    }

    /// Moves to `page`, clamped into `[1, total_pages(len)]`.
    pub fn set_page(&mut self, page: usize, len: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages(len));
        self.current_page
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Items of the current page; empty when the page lies past the end.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        self.window(self.current_page, items)
    }

    /// The current page re-clamped against `items`, which may have shrunk
    /// since the page was chosen.
    pub fn page<T: Clone>(&self, items: &[T]) -> Page<T> {
        let total_pages = self.total_pages(items.len());
        let number = self.current_page.min(total_pages);
        Page {
            items: self.window(number, items).to_vec(),
            number,
            total_pages,
            total_items: items.len(),
        }
    }

    fn window<'a, T>(&self, page: usize, items: &'a [T]) -> &'a [T] {
        let start = (page - 1).saturating_mul(self.page_size.get());
        let end = start.saturating_add(self.page_size.get()).min(items.len());
        items.get(start..end).unwrap_or(&[])
    }
}
