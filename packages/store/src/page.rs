//! Page requests for logbook listings.

/// Number of entries on one listing page.
pub const ENTRIES_PER_PAGE: u64 = 20;

/// A 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(u64);

impl Page {
    pub const FIRST: Page = Page(1);

    /// Parse a `?page=` value. Missing, non-numeric or non-positive input is page 1.
    pub fn parse(input: Option<&str>) -> Self {
        input
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Page::new)
            .unwrap_or(Page::FIRST)
    }

    pub fn new(number: u64) -> Self {
        Page(number.max(1))
    }

    pub fn number(&self) -> u64 {
        self.0
    }

    pub fn offset(&self) -> u64 {
        (self.0 - 1).saturating_mul(ENTRIES_PER_PAGE)
    }

    pub fn limit(&self) -> u64 {
        ENTRIES_PER_PAGE
    }

    /// The previous page, or `None` on the first page.
    pub fn prev(&self) -> Option<Page> {
        (self.0 > 1).then(|| Page(self.0 - 1))
    }

    pub fn next(&self) -> Page {
        Page(self.0.saturating_add(1))
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::FIRST
    }
}
