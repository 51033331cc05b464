//! Offset pagination for post listings.
//!
//! Requested page numbers come straight from the query string, so anything
//! unparsable falls back to the first page and out-of-range numbers clamp to
//! the nearest valid page. Listing never fails because of a bad `?page=`.

use serde::Serialize;
use serde::ser::SerializeStruct;

/// Page size used by every post listing.
pub const POSTS_PER_PAGE: u64 = 10;

/// Position of one page inside a collection of `count` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number, always within `1..=num_pages`.
    pub number: u64,
    /// At least 1, even for an empty collection.
    pub num_pages: u64,
    /// Total number of items across all pages.
    pub count: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Splits an ordered collection into fixed-size pages.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: u64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}

impl Paginator {
    pub fn new(per_page: u64) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn num_pages(&self, count: u64) -> u64 {
        count.div_ceil(self.per_page).max(1)
    }

    /// Resolve a raw `page` parameter against a collection size.
    pub fn window(&self, count: u64, requested: Option<&str>) -> PageWindow {
        let num_pages = self.num_pages(count);
        let number = match requested.map(str::trim).and_then(parse_page) {
            None => 1,
            Some(n) if n < 1 => 1,
            Some(n) => u64::try_from(n).unwrap_or(num_pages).min(num_pages),
        };

        PageWindow {
            number,
            num_pages,
            count,
            offset: (number - 1) * self.per_page,
            limit: self.per_page,
        }
    }

    /// Paginate a collection that is already in memory.
    pub fn paginate<T>(&self, items: Vec<T>, requested: Option<&str>) -> Page<T> {
        let window = self.window(items.len() as u64, requested);
        let object_list = items
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .collect();

        Page::from_window(window, object_list)
    }
}

/// Integer value of a `page` parameter. Digit strings too long for `i128`
/// saturate in the direction of their sign.
fn parse_page(raw: &str) -> Option<i128> {
    if let Ok(n) = raw.parse::<i128>() {
        return Some(n);
    }
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i128::MIN } else { i128::MAX })
}

/// One page of results plus the metadata needed for next/previous controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub object_list: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    per_page: u64,
}

impl<T> Page<T> {
    /// Wrap items that were fetched with `window.offset` / `window.limit`.
    pub fn from_window(window: PageWindow, object_list: Vec<T>) -> Self {
        Self {
            object_list,
            number: window.number,
            num_pages: window.num_pages,
            count: window.count,
            per_page: window.limit,
        }
    }

    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then_some(self.number - 1)
    }

    /// 1-based index of the first item on this page, 0 when empty.
    pub fn start_index(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            (self.number - 1) * self.per_page + 1
        }
    }

    /// 1-based index of the last item on this page, 0 when empty.
    pub fn end_index(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            self.start_index() + self.object_list.len() as u64 - 1
        }
    }

    pub fn page_range(&self) -> Vec<u64> {
        (1..=self.num_pages).collect()
    }

    /// Convert the items while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            object_list: self.object_list.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            per_page: self.per_page,
        }
    }
}

impl<T: Serialize> Serialize for Page<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Page", 12)?;
        state.serialize_field("object_list", &self.object_list)?;
        state.serialize_field("number", &self.number)?;
        state.serialize_field("num_pages", &self.num_pages)?;
        state.serialize_field("count", &self.count)?;
        state.serialize_field("has_next", &self.has_next())?;
        state.serialize_field("has_previous", &self.has_previous())?;
        state.serialize_field("has_other_pages", &(self.num_pages > 1))?;
        state.serialize_field("next_page_number", &self.next_page_number())?;
        state.serialize_field("previous_page_number", &self.previous_page_number())?;
        state.serialize_field("start_index", &self.start_index())?;
        state.serialize_field("end_index", &self.end_index())?;
        state.serialize_field("page_range", &self.page_range())?;
        state.end()
    }
}
