//! Page requests and page results.

use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, DomainResult};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Zero-based page index plus page size (always ≥ 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> DomainResult<Self> {
        if page < 0 {
            return Err(DomainError::bad_request("Page must not be negative"));
        }
        if size < 1 {
            return Err(DomainError::bad_request("Page size must be greater than 0"));
        }
        let page = u32::try_from(page)
            .map_err(|_| DomainError::bad_request(format!("Page must not exceed {}", u32::MAX)))?;
        let size = u32::try_from(size).map_err(|_| {
            DomainError::bad_request(format!("Page size must not exceed {}", u32::MAX))
        })?;
        Ok(Self { page, size })
    }

    pub fn first(size: u32) -> Self {
        Self {
            page: 0,
            size: size.max(1),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of records to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the total across all pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub request: PageRequest,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            request,
            total,
        }
    }

    /// Cut one page out of an already collected, already ordered set.
    pub fn paginate(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let items = match usize::try_from(request.offset()) {
            Ok(offset) if offset < all.len() => all
                .into_iter()
                .skip(offset)
                .take(request.size() as usize)
                .collect(),
            _ => Vec::new(),
        };
        Self::new(items, request, total)
    }

    /// Number of items on this page.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            request: self.request,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn negative_page_is_rejected() {
        let err = PageRequest::new(-1, 10).unwrap_err();
        assert_eq!(err.to_string(), "Page must not be negative");
    }

    #[test]
    fn zero_size_is_rejected() {
        let err = PageRequest::new(0, 0).unwrap_err();
        assert_eq!(err.to_string(), "Page size must be greater than 0");
    }

    #[test]
    fn page_past_the_end_is_empty_but_keeps_total() {
        let page = Page::paginate((1..=5).collect::<Vec<_>>(), PageRequest::new(3, 2).unwrap());
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);
    }

    #[test]
    fn second_page_holds_the_next_slice() {
        let page = Page::paginate((1..=5).collect::<Vec<_>>(), PageRequest::new(1, 2).unwrap());
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.count(), 2);
    }

    proptest! {
        #[test]
        fn page_length_matches_the_remaining_items(
            n in 0usize..200,
            page in 0i64..50,
            size in 1i64..50,
        ) {
            let request = PageRequest::new(page, size).unwrap();
            let result = Page::paginate((0..n).collect::<Vec<_>>(), request);

            let skipped = (page * size) as usize;
            let expected = n.saturating_sub(skipped).min(size as usize);
            prop_assert_eq!(result.count(), expected);
            prop_assert_eq!(result.total, n as u64);
            if expected > 0 {
                prop_assert_eq!(result.items[0], skipped);
            }
        }
    }
}
