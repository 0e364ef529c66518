//! Page-number pagination over a client-side result set.

use std::{cmp, num::NonZeroUsize};

use derive_more::Display;

/// Number of items on a single [`Page`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    /// Creates a new [`PageSize`] out of the provided positive number.
    #[must_use]
    pub fn new(size: usize) -> Option<Self> {
        NonZeroUsize::new(size).map(Self)
    }

    /// Returns the number of items on a [`Page`].
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(NonZeroUsize::MIN.saturating_add(7))
    }
}

/// 1-based number of a page.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Page(NonZeroUsize);

impl Page {
    /// The first [`Page`].
    pub const FIRST: Self = Self(NonZeroUsize::MIN);

    /// Creates a new [`Page`] out of the provided 1-based number.
    #[must_use]
    pub fn new(number: usize) -> Option<Self> {
        NonZeroUsize::new(number).map(Self)
    }

    /// Returns the 1-based number of this [`Page`].
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Control of a page window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Control {
    /// Button leading to the [`Page`].
    Number(Page),

    /// Gap between two non-adjacent [`Page`]s.
    Gap,
}

/// Figures describing which items are shown.
///
/// `start` and `end` are 1-based and inclusive, `start` is `0` for an empty
/// result set.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[display("{start}–{end} of {total}")]
pub struct Range {
    /// Position of the first shown item.
    pub start: usize,

    /// Position of the last shown item.
    pub end: usize,

    /// Total number of items.
    pub total: usize,
}

/// Page-number pagination state.
///
/// The current [`Page`] always stays within `[1, max(total_pages, 1)]`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Pagination {
    /// Size of a single [`Page`].
    size: PageSize,

    /// Currently selected [`Page`].
    page: Page,

    /// Total number of paginated items.
    total: usize,
}

impl Pagination {
    /// Number of pages up to which every page gets its own [`Control`].
    pub const FULL_WINDOW: usize = 7;

    /// Creates a new [`Pagination`] over an empty result set.
    #[must_use]
    pub fn new(size: PageSize) -> Self {
        Self {
            size,
            page: Page::FIRST,
            total: 0,
        }
    }

    /// Returns the [`PageSize`] of this [`Pagination`].
    #[must_use]
    pub const fn size(&self) -> PageSize {
        self.size
    }

    /// Returns the currently selected [`Page`].
    #[must_use]
    pub const fn page(&self) -> Page {
        self.page
    }

    /// Returns the total number of paginated items.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Returns the number of pages, which is `0` for an empty result set.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.size.get())
    }

    /// Replaces the paginated result set size and moves to the first page.
    pub fn reset(&mut self, total: usize) {
        self.total = total;
        self.page = Page::FIRST;
    }

    /// Replaces the paginated result set size keeping the current page
    /// whenever it still exists.
    pub fn resize(&mut self, total: usize) {
        self.total = total;
        let _ = self.set_page(self.page.get());
    }

    /// Selects the page with the provided number, clamping it into the
    /// existing pages.
    ///
    /// Returns the actually selected [`Page`].
    pub fn set_page(&mut self, number: usize) -> Page {
        let last = cmp::max(self.total_pages(), 1);
        self.page = Page::new(number.clamp(1, last)).unwrap_or(Page::FIRST);
        self.page
    }

    /// Indicates whether a page precedes the current one.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page.get() > 1
    }

    /// Indicates whether a page follows the current one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page.get() < self.total_pages()
    }

    /// Returns the window of page [`Control`]s around the current page.
    ///
    /// Every page is listed while there are at most [`FULL_WINDOW`] of them.
    /// Otherwise the first, the last, the current and its neighbours are
    /// listed with [`Control::Gap`]s between non-adjacent numbers.
    ///
    /// [`FULL_WINDOW`]: Self::FULL_WINDOW
    #[must_use]
    pub fn window(&self) -> Vec<Control> {
        let last = self.total_pages();
        if last <= Self::FULL_WINDOW {
            return (1..=last)
                .filter_map(Page::new)
                .map(Control::Number)
                .collect();
        }

        let current = self.page.get();
        let mut kept = [1, last, current - 1, current, current + 1]
            .into_iter()
            .filter(|n| (1..=last).contains(n))
            .collect::<Vec<_>>();
        kept.sort_unstable();
        kept.dedup();

        let mut window = Vec::with_capacity(kept.len() * 2);
        let mut previous = None;
        for n in kept {
            if previous.is_some_and(|p: usize| n - p > 1) {
                window.push(Control::Gap);
            }
            window.extend(Page::new(n).map(Control::Number));
            previous = Some(n);
        }
        window
    }

    /// Returns the [`Range`] of items shown on the current page.
    #[must_use]
    pub fn range(&self) -> Range {
        let offset = self.offset();
        let end = cmp::min(offset + self.size.get(), self.total);
        Range {
            start: if self.total == 0 { 0 } else { offset + 1 },
            end,
            total: self.total,
        }
    }

    /// Slices the items shown on the current page out of the provided ones.
    #[must_use]
    pub fn slice<'i, T>(&self, items: &'i [T]) -> &'i [T] {
        let start = cmp::min(self.offset(), items.len());
        let end = cmp::min(start + self.size.get(), items.len());
        &items[start..end]
    }

    /// Returns the number of items preceding the current page.
    fn offset(&self) -> usize {
        (self.page.get() - 1) * self.size.get()
    }
}

#[cfg(test)]
mod spec {
    use super::{Control, Page, PageSize, Pagination, Range};

    fn pagination(size: usize, total: usize) -> Pagination {
        let mut p = Pagination::new(PageSize::new(size).unwrap());
        p.reset(total);
        p
    }

    fn numbers(window: &[Control]) -> Vec<Option<usize>> {
        window
            .iter()
            .map(|c| match c {
                Control::Number(p) => Some(p.get()),
                Control::Gap => None,
            })
            .collect()
    }

    #[test]
    fn counts_pages_by_ceiling() {
        assert_eq!(pagination(8, 0).total_pages(), 0);
        assert_eq!(pagination(8, 1).total_pages(), 1);
        assert_eq!(pagination(8, 8).total_pages(), 1);
        assert_eq!(pagination(8, 9).total_pages(), 2);
        assert_eq!(pagination(8, 20).total_pages(), 3);
    }

    #[test]
    fn default_page_size_is_eight() {
        assert_eq!(PageSize::default().get(), 8);
    }

    #[test]
    fn clamps_selected_page() {
        let mut p = pagination(8, 20);

        assert_eq!(p.set_page(0), Page::FIRST);
        assert_eq!(p.set_page(2).get(), 2);
        assert_eq!(p.set_page(99).get(), 3);

        let mut empty = pagination(8, 0);
        assert_eq!(empty.set_page(5), Page::FIRST);
    }

    #[test]
    fn keeps_page_within_bounds_on_resize() {
        let mut p = pagination(8, 40);
        let _ = p.set_page(5);

        p.resize(10);
        assert_eq!(p.page().get(), 2);

        p.resize(100);
        assert_eq!(p.page().get(), 2);

        p.reset(100);
        assert_eq!(p.page(), Page::FIRST);
    }

    #[test]
    fn lists_every_page_in_small_windows() {
        assert!(pagination(8, 0).window().is_empty());
        assert_eq!(
            numbers(&pagination(1, 7).window()),
            (1..=7).map(Some).collect::<Vec<_>>(),
        );
    }

    #[test]
    fn collapses_large_windows_with_gaps() {
        let mut p = pagination(1, 12);

        assert_eq!(numbers(&p.window()), [Some(1), Some(2), None, Some(12)]);

        let _ = p.set_page(5);
        assert_eq!(
            numbers(&p.window()),
            [Some(1), None, Some(4), Some(5), Some(6), None, Some(12)],
        );

        let _ = p.set_page(3);
        assert_eq!(
            numbers(&p.window()),
            [Some(1), Some(2), Some(3), Some(4), None, Some(12)],
        );

        let _ = p.set_page(12);
        assert_eq!(numbers(&p.window()), [Some(1), None, Some(11), Some(12)]);
    }

    #[test]
    fn window_stays_within_pages() {
        for total in 1..40 {
            for page in 1..=total {
                let mut p = pagination(1, total);
                let _ = p.set_page(page);
                let window = numbers(&p.window());

                assert_eq!(window.first(), Some(&Some(1)));
                assert_eq!(window.last(), Some(&Some(total)));
                assert!(window
                    .iter()
                    .flatten()
                    .all(|n| (1..=total).contains(n)));
            }
        }
    }

    #[test]
    fn reports_shown_range() {
        let mut p = pagination(8, 20);
        assert_eq!(
            p.range(),
            Range {
                start: 1,
                end: 8,
                total: 20,
            },
        );

        let _ = p.set_page(3);
        assert_eq!(p.range().to_string(), "17–20 of 20");

        assert_eq!(pagination(8, 0).range().to_string(), "0–0 of 0");
    }

    #[test]
    fn slices_current_page() {
        let items = (1..=20).collect::<Vec<_>>();
        let mut p = pagination(8, items.len());

        assert_eq!(p.slice(&items), &items[0..8]);
        let _ = p.set_page(3);
        assert_eq!(p.slice(&items), &items[16..20]);
        assert!(!p.has_next());
        assert!(p.has_previous());
        assert!(p.slice::<u8>(&[]).is_empty());
    }
}
