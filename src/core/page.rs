//! Result pagination
//!
//! A finalized result list revealed to the presentation layer a page at a
//! time. The cursor only moves forward (until `reset`) and never passes the
//! end of the list.

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone)]
pub struct ResultPages<T> {
    items: Vec<T>,
    cursor: usize,
    page_size: usize,
}

impl<T> ResultPages<T> {
    /// A page size of zero is treated as one.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            cursor: 0,
            page_size: page_size.max(1),
        }
    }

    /// Reveal up to one page of not-yet-rendered items.
    ///
    /// Returns an empty slice once everything has been rendered.
    pub fn next_page(&mut self) -> &[T] {
        let start = self.cursor;
        let end = (start + self.page_size).min(self.items.len());
        self.cursor = end;
        &self.items[start..end]
    }

    /// `render(true)` starts over from the first item.
    pub fn render(&mut self, reset: bool) -> &[T] {
        if reset {
            self.reset();
        }
        self.next_page()
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Everything revealed so far.
    pub fn rendered(&self) -> &[T] {
        &self.items[..self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.cursor < self.items.len()
    }

    pub fn remaining(&self) -> usize {
        self.items.len() - self.cursor
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn position<F>(&self, pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.items.iter().position(pred)
    }

    /// Remove one item, keeping already-rendered items rendered.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        if index < self.cursor {
            self.cursor -= 1;
        }
        Some(self.items.remove(index))
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_advance_and_stop_at_end() {
        let mut pages = ResultPages::new((0..5).collect::<Vec<_>>(), 2);

        assert_eq!(pages.next_page(), [0, 1]);
        assert_eq!(pages.next_page(), [2, 3]);
        assert_eq!(pages.next_page(), [4]);
        assert!(!pages.has_more());
        assert!(pages.next_page().is_empty());
        assert_eq!(pages.cursor(), 5);
    }

    #[test]
    fn test_reset_starts_over() {
        let mut pages = ResultPages::new(vec!['a', 'b', 'c'], 2);
        pages.next_page();
        pages.next_page();

        assert_eq!(pages.render(true), ['a', 'b']);
        assert_eq!(pages.rendered(), ['a', 'b']);
        assert_eq!(pages.remaining(), 1);
    }

    #[test]
    fn test_zero_page_size_is_one() {
        let mut pages = ResultPages::new(vec![1, 2], 0);
        assert_eq!(pages.page_size(), 1);
        assert_eq!(pages.next_page(), [1]);
    }

    #[test]
    fn test_remove_keeps_cursor_consistent() {
        let mut pages = ResultPages::new(vec![10, 20, 30, 40], 2);
        pages.next_page();

        // Rendered item removed: cursor follows
        assert_eq!(pages.remove(0), Some(10));
        assert_eq!(pages.cursor(), 1);
        assert_eq!(pages.rendered(), [20]);

        // Unrendered item removed: cursor untouched
        assert_eq!(pages.remove(2), Some(40));
        assert_eq!(pages.cursor(), 1);
        assert_eq!(pages.next_page(), [30]);
        assert_eq!(pages.remove(9), None);
    }

    #[test]
    fn test_empty_collection() {
        let mut pages: ResultPages<u8> = ResultPages::new(Vec::new(), DEFAULT_PAGE_SIZE);
        assert!(pages.next_page().is_empty());
        assert!(!pages.has_more());
    }
}
