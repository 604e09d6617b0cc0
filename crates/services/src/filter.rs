//! Shared pieces of the query-string filter objects.
//!
//! Filters are plain structs with named optional fields. They derive
//! [`Validate`] so the HTTP layer can reject out-of-range values before the
//! service is called.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// 1-based pagination request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PageRequest {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: Option<u32>,
}

impl PageRequest {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self { page, page_size }
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    fn offset(&self) -> usize {
        (self.page() as usize - 1) * self.page_size() as usize
    }

    /// Cut one page out of an already filtered and ordered result set.
    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(self.offset())
            .take(self.page_size() as usize)
            .collect();

        Page {
            items,
            page: self.page(),
            page_size: self.page_size(),
            total,
        }
    }
}

/// One page of a list result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

/// Optional reporting window (`from` inclusive, `to` exclusive).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_date_range_filter"))]
pub struct DateRangeFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRangeFilter {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| at >= from) && self.to.is_none_or(|to| at < to)
    }
}

fn validate_date_range_filter(filter: &DateRangeFilter) -> Result<(), ValidationError> {
    validate_date_range(filter.from, filter.to)
}

/// `from` must not be after `to` when both are present.
pub fn validate_date_range(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => {
            let mut err = ValidationError::new("date_range");
            err.message = Some("`from` must not be after `to`".into());
            Err(err)
        }
        _ => Ok(()),
    }
}
