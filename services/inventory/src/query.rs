//! Sorting and pagination primitives shared by the store backends

use std::cmp::Ordering;

use crate::models::Product;

/// Default page size when the caller does not provide one
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Sort order for product listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    #[default]
    NameAsc,
}

impl SortKey {
    /// Parse the `sortBy` query value; unknown or missing keys sort by name
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("price_asc") => SortKey::PriceAsc,
            Some("price_desc") => SortKey::PriceDesc,
            _ => SortKey::NameAsc,
        }
    }

    /// Compare two products; ties fall back to id so pages stay stable
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        let primary = match self {
            SortKey::PriceAsc => a.price.cmp(&b.price),
            SortKey::PriceDesc => b.price.cmp(&a.price),
            SortKey::NameAsc => a.name.cmp(&b.name),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    /// SQL `ORDER BY` clause matching [`SortKey::compare`]
    pub fn order_by(self) -> &'static str {
        match self {
            SortKey::PriceAsc => "price ASC, id ASC",
            SortKey::PriceDesc => "price DESC, id ASC",
            SortKey::NameAsc => "name COLLATE \"C\" ASC, id ASC",
        }
    }
}

/// Filter applied on top of the implicit `is_active` predicate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub category: Option<String>,
}

impl ListFilter {
    /// Build a filter; an empty category means no filtering
    pub fn new(category: Option<&str>) -> Self {
        Self {
            category: category.filter(|c| !c.is_empty()).map(str::to_string),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        product.is_active
            && self
                .category
                .as_deref()
                .is_none_or(|category| product.category == category)
    }
}

/// The `(skip, take)` slice for a 1-based page number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: i64,
    page_size: i64,
}

impl PageWindow {
    /// Clamp the requested page to `>= 1` and the size to `1..=max_page_size`
    pub fn new(page: Option<i64>, page_size: Option<i64>, max_page_size: i64) -> Self {
        let max_page_size = max_page_size.max(1);
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, max_page_size),
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// Number of pages needed to hold `total_items`
    pub fn total_pages(&self, total_items: i64) -> i64 {
        if total_items <= 0 {
            return 0;
        }
        (total_items + self.page_size - 1) / self.page_size
    }

    /// Apply the window to an already filtered and ordered sequence
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let skip = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(take).collect()
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(None, None, DEFAULT_PAGE_SIZE)
    }
}

/// One window of a result set together with the unpaginated count
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: i64,
}
