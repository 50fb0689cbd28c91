//! Page-indexed and load-more pagination over filtered record sets

use std::ops::Range;

use serde::Deserialize;

/// Fixed set of page sizes offered to the operator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "usize")]
pub enum PageSize {
    Ten,
    #[default]
    TwentyFive,
    Fifty,
    Hundred,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("page size must be one of 10, 25, 50 or 100 (got {0})")]
pub struct InvalidPageSize(pub usize);

impl PageSize {
    pub const ALL: [PageSize; 4] = [Self::Ten, Self::TwentyFive, Self::Fifty, Self::Hundred];

    /// Number of records per page
    pub fn get(&self) -> usize {
        match self {
            Self::Ten => 10,
            Self::TwentyFive => 25,
            Self::Fifty => 50,
            Self::Hundred => 100,
        }
    }

    /// Cycle to the next size
    pub fn next(&self) -> Self {
        match self {
            Self::Ten => Self::TwentyFive,
            Self::TwentyFive => Self::Fifty,
            Self::Fifty => Self::Hundred,
            Self::Hundred => Self::Ten,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = InvalidPageSize;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or(InvalidPageSize(value))
    }
}

/// Number of pages needed for `total_items`; never less than one
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}

/// One visible slice of a record set
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Records on this page
    pub items: &'a [T],
    /// Page actually shown, after clamping (1-based)
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// Index of the first item within the whole set
    pub offset: usize,
}

impl<T> Page<'_, T> {
    /// Positions covered by this page within the whole set
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.items.len()
    }

    pub fn is_first(&self) -> bool {
        self.current_page == 1
    }

    pub fn is_last(&self) -> bool {
        self.current_page == self.total_pages
    }

    /// "Page 2 of 4"
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }
}

/// Slice `records` into pages of `page_size` and return page `current_page`.
///
/// The requested page is clamped into `[1, total_pages]`.
pub fn paginate<T>(records: &[T], page_size: usize, current_page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(records.len(), page_size);
    let current_page = current_page.clamp(1, total_pages);

    let start = ((current_page - 1) * page_size).min(records.len());
    let end = (start + page_size).min(records.len());

    Page {
        items: &records[start..end],
        current_page,
        total_pages,
        total_items: records.len(),
        offset: start,
    }
}

/// Current page and page size of one view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageState {
    pub current_page: usize,
    pub page_size: PageSize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl PageState {
    /// Start on page 1
    pub fn new(page_size: PageSize) -> Self {
        Self {
            current_page: 1,
            page_size,
        }
    }

    /// Visible page of `records` for this state
    pub fn paginate<'a, T>(&self, records: &'a [T]) -> Page<'a, T> {
        paginate(records, self.page_size.get(), self.current_page)
    }

    /// Clamp the current page to a set of `total_items`
    pub fn clamp(self, total_items: usize) -> Self {
        let last = total_pages(total_items, self.page_size.get());
        Self {
            current_page: self.current_page.clamp(1, last),
            ..self
        }
    }

    /// Advance one page; stays put on the last page
    pub fn next(self, total_items: usize) -> Self {
        let clamped = self.clamp(total_items);
        let last = total_pages(total_items, self.page_size.get());
        if clamped.current_page < last {
            Self {
                current_page: clamped.current_page + 1,
                ..clamped
            }
        } else {
            clamped
        }
    }

    /// Go back one page; stays put on page 1
    pub fn previous(self) -> Self {
        Self {
            current_page: self.current_page.saturating_sub(1).max(1),
            ..self
        }
    }

    /// Change the page size and return to page 1
    pub fn with_page_size(self, page_size: PageSize) -> Self {
        Self::new(page_size)
    }

    /// Return to page 1
    pub fn reset(self) -> Self {
        Self::new(self.page_size)
    }
}

/// Offset-accumulating window: each step fetches the next batch and appends it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadMoreState {
    /// Records fetched so far
    pub loaded: usize,
    /// Batch size
    pub step: usize,
    /// Last batch came back short
    pub exhausted: bool,
}

impl LoadMoreState {
    pub fn new(step: usize) -> Self {
        Self {
            loaded: 0,
            step: step.max(1),
            exhausted: false,
        }
    }

    /// `(skip, top)` of the next batch, or None once exhausted
    pub fn next_window(&self) -> Option<(usize, usize)> {
        (!self.exhausted).then_some((self.loaded, self.step))
    }

    /// Account for a batch of `fetched` records
    pub fn record_batch(self, fetched: usize) -> Self {
        Self {
            loaded: self.loaded + fetched,
            exhausted: fetched < self.step,
            ..self
        }
    }

    /// Forget everything loaded
    pub fn reset(self) -> Self {
        Self::new(self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_thirty_seven_records_at_twenty_five() {
        let records = numbers(37);

        let first = paginate(&records, 25, 1);
        assert_eq!(first.items, &records[0..25]);
        assert_eq!(first.total_pages, 2);

        let second = paginate(&records, 25, 2);
        assert_eq!(second.items, &records[25..37]);
        assert_eq!(second.range(), 25..37);

        let third = paginate(&records, 25, 3);
        assert_eq!(third.current_page, 2);
        assert_eq!(third.items, &records[25..37]);
    }

    #[test]
    fn test_total_pages() {
        for p in 1..=30 {
            assert_eq!(total_pages(0, p), 1);
            for n in 1..=120 {
                assert_eq!(total_pages(n, p), n.div_ceil(p), "n={n} p={p}");
                assert_eq!(paginate(&numbers(n), p, 1).total_pages, n.div_ceil(p));
            }
        }
    }

    #[test]
    fn test_out_of_range_pages_clamp_to_nearest_bound() {
        let records = numbers(12);
        assert_eq!(paginate(&records, 5, 0).current_page, 1);
        assert_eq!(paginate(&records, 5, 99).current_page, 3);
        assert_eq!(paginate(&records, 5, 99).items, &[10, 11]);
    }

    #[test]
    fn test_empty_set_has_one_empty_page() {
        let records: Vec<usize> = Vec::new();
        let page = paginate(&records, 25, 4);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert!(page.is_first() && page.is_last());
    }

    #[test]
    fn test_zero_page_size_is_treated_as_one() {
        let records = numbers(3);
        let page = paginate(&records, 0, 2);
        assert_eq!(page.items, &[1]);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_page_state_transitions() {
        let state = PageState::new(PageSize::TwentyFive);
        assert_eq!(state.previous().current_page, 1);

        let state = state.next(37);
        assert_eq!(state.current_page, 2);
        assert_eq!(state.next(37).current_page, 2);
        assert_eq!(state.previous().current_page, 1);
    }

    #[test]
    fn test_page_state_clamps_when_set_shrinks() {
        let state = PageState {
            current_page: 4,
            page_size: PageSize::Ten,
        };
        assert_eq!(state.clamp(15).current_page, 2);
        assert_eq!(state.clamp(0).current_page, 1);
        assert_eq!(state.paginate(&numbers(15)).items, &numbers(15)[10..15]);
    }

    #[test]
    fn test_changing_page_size_returns_to_first_page() {
        let state = PageState::new(PageSize::Ten).next(100).next(100);
        assert_eq!(state.current_page, 3);
        let resized = state.with_page_size(PageSize::Fifty);
        assert_eq!(resized.current_page, 1);
        assert_eq!(resized.page_size.get(), 50);
        assert_eq!(state.reset().current_page, 1);
    }

    #[test]
    fn test_page_size_from_number() {
        assert_eq!(PageSize::try_from(50), Ok(PageSize::Fifty));
        assert_eq!(PageSize::try_from(30), Err(InvalidPageSize(30)));
        assert_eq!(PageSize::Hundred.next(), PageSize::Ten);
    }

    #[test]
    fn test_load_more_windows() {
        let state = LoadMoreState::new(50);
        assert_eq!(state.next_window(), Some((0, 50)));

        let state = state.record_batch(50);
        assert_eq!(state.next_window(), Some((50, 50)));

        let state = state.record_batch(12);
        assert_eq!(state.loaded, 62);
        assert!(state.exhausted);
        assert_eq!(state.next_window(), None);

        assert_eq!(state.reset().next_window(), Some((0, 50)));
    }
}
