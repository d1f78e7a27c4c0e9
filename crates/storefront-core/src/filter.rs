//! Catalog Filter State
//!
//! The pending search/category/sort/price selection and its URL query
//! encoding. Toggles only touch this state; Apply serializes it.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::validation::FieldErrors;

/// Characters escaped in query components and path segments (RFC 3986
/// unreserved are kept)
pub(crate) const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Catalog sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Name,
    Rating,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Newest,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::Name,
        SortKey::Rating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
            SortKey::Name => "name",
            SortKey::Rating => "rating",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Newest => "Newest",
            SortKey::PriceAsc => "Price: low to high",
            SortKey::PriceDesc => "Price: high to low",
            SortKey::Name => "Name",
            SortKey::Rating => "Top rated",
        }
    }
}

/// Everything the catalog fetch depends on
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub search: String,
    /// Checked subcategory ids
    pub category_ids: Vec<u32>,
    pub sort: SortKey,
    /// Cents
    pub min_price: Option<i64>,
    /// Cents
    pub max_price: Option<i64>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category_ids: Vec::new(),
            sort: SortKey::default(),
            min_price: None,
            max_price: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterState {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    /// Whether the filter endpoint is needed instead of the plain listing
    pub fn has_constraints(&self) -> bool {
        !self.search.trim().is_empty()
            || !self.category_ids.is_empty()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.sort != SortKey::default()
    }

    /// Same filters, first page
    pub fn reset_page(&self) -> Self {
        Self {
            page: 1,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.min_price.is_some_and(|p| p < 0) {
            errors.add("minPrice", "Minimum price cannot be negative");
        }
        if self.max_price.is_some_and(|p| p < 0) {
            errors.add("maxPrice", "Maximum price cannot be negative");
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                errors.add("maxPrice", "Maximum price must not be below the minimum");
            }
        }
        errors
    }

    /// Query parameters in a stable order
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("search", search.to_string()));
        }
        if !self.category_ids.is_empty() {
            let ids: Vec<String> = self.category_ids.iter().map(u32::to_string).collect();
            pairs.push(("categoryIds", ids.join(",")));
        }
        if self.sort != SortKey::default() {
            pairs.push(("sortBy", self.sort.as_str().to_string()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("maxPrice", max.to_string()));
        }
        pairs.push(("pageNumber", self.page.to_string()));
        pairs.push(("pageSize", self.page_size.to_string()));
        pairs
    }

    /// Encoded query string without the leading `?`
    pub fn to_query_string(&self) -> String {
        self.to_query_pairs()
            .iter()
            .map(|(key, value)| format!("{}={}", key, utf8_percent_encode(value, QUERY_COMPONENT)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Restore filters from a URL query string (leading `?` optional).
    /// Unknown keys and malformed values are ignored.
    pub fn from_query_string(query: &str) -> Self {
        let mut state = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for part in query.split('&').filter(|p| !p.is_empty()) {
            let (key, raw) = part.split_once('=').unwrap_or((part, ""));
            let value = decode_component(raw);
            match key {
                "search" => state.search = value,
                "categoryIds" => {
                    state.category_ids = value
                        .split(',')
                        .filter_map(|id| id.trim().parse().ok())
                        .collect();
                }
                "sortBy" => {
                    if let Some(sort) = SortKey::parse(&value) {
                        state.sort = sort;
                    }
                }
                "minPrice" => state.min_price = value.parse().ok(),
                "maxPrice" => state.max_price = value.parse().ok(),
                "pageNumber" => {
                    if let Some(page) = value.parse().ok().filter(|p: &u32| *p > 0) {
                        state.page = page;
                    }
                }
                "pageSize" => {
                    if let Some(size) = value.parse().ok().filter(|s: &u32| *s > 0) {
                        state.page_size = size;
                    }
                }
                _ => {}
            }
        }
        state
    }
}

fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    percent_decode_str(&raw).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_has_no_constraints() {
        let state = FilterState::default();
        assert!(!state.has_constraints());
        assert_eq!(state.to_query_string(), "pageNumber=1&pageSize=12");
    }

    #[test]
    fn test_query_string_encodes_search() {
        let state = FilterState {
            search: "red shoes & socks".to_string(),
            category_ids: vec![11, 12],
            page: 2,
            ..Default::default()
        };
        assert_eq!(
            state.to_query_string(),
            "search=red%20shoes%20%26%20socks&categoryIds=11%2C12&pageNumber=2&pageSize=12"
        );
    }

    #[test]
    fn test_query_string_restores_filters() {
        let state = FilterState {
            search: "wool coat".to_string(),
            category_ids: vec![3, 7],
            sort: SortKey::PriceDesc,
            min_price: Some(1000),
            max_price: Some(5000),
            page: 3,
            page_size: 24,
        };
        let restored = FilterState::from_query_string(&format!("?{}", state.to_query_string()));
        assert_eq!(restored, state);
    }

    #[test]
    fn test_from_query_string_ignores_garbage() {
        let state = FilterState::from_query_string("pageNumber=0&pageSize=x&sortBy=bogus&foo=bar&search=a+b");
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(state.sort, SortKey::Newest);
        assert_eq!(state.search, "a b");
    }

    #[test]
    fn test_price_bounds_validation() {
        let state = FilterState {
            min_price: Some(500),
            max_price: Some(100),
            ..Default::default()
        };
        let errors = state.validate();
        assert!(errors.contains("maxPrice"));

        let state = FilterState {
            min_price: Some(-1),
            ..Default::default()
        };
        assert!(state.validate().contains("minPrice"));
        assert!(FilterState::default().validate().is_empty());
    }

    #[test]
    fn test_reset_page_keeps_filters() {
        let state = FilterState {
            category_ids: vec![4],
            page: 5,
            ..Default::default()
        };
        let reset = state.reset_page();
        assert_eq!(reset.page, 1);
        assert_eq!(reset.category_ids, vec![4]);
    }
}
