//! Page math shared by listing and search.

use crate::todo::error::ServiceError;
use crate::todo::model::{PaginationInfo, PaginationInput};

/// A validated page request handed to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Records per page, at least 1.
    pub count: u64,
    /// 1-based page number.
    pub page: u64,
}

impl PageRequest {
    /// Check the 1-based preconditions for `operation`.
    pub fn validate(operation: &'static str, input: PaginationInput) -> Result<Self, ServiceError> {
        if input.count < 1 {
            return Err(ServiceError::invalid_argument(
                operation,
                "count must be >= 1 (1 based indexing)",
            ));
        }
        if input.page < 1 {
            return Err(ServiceError::invalid_argument(
                operation,
                "page must be >= 1 (1 based indexing)",
            ));
        }
        Ok(Self {
            count: input.count as u64,
            page: input.page as u64,
        })
    }

    /// Number of matching records that precede this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.count)
    }

    /// Paging facts for a query that matched `total_count` records.
    pub fn info(&self, total_count: u64) -> PaginationInfo {
        PaginationInfo {
            total_count,
            current_page: self.page,
            total_pages: total_pages(total_count, self.count),
        }
    }
}

/// `ceil(total_count / count)`.
pub fn total_pages(total_count: u64, count: u64) -> u64 {
    total_count.div_ceil(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::error::ErrorKind;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(7, 1), 7);
    }

    #[test]
    fn test_offset() {
        let req = PageRequest { count: 10, page: 2 };
        assert_eq!(req.offset(), 10);
        let req = PageRequest { count: 5, page: 1 };
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_info_keeps_current_page() {
        let info = PageRequest { count: 10, page: 2 }.info(25);
        assert_eq!(info.total_count, 25);
        assert_eq!(info.current_page, 2);
        assert_eq!(info.total_pages, 3);
    }

    #[test]
    fn test_validate_rejects_zero_count() {
        let err = PageRequest::validate("todo_pages", PaginationInput { count: 0, page: 1 })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("count"));
    }

    #[test]
    fn test_validate_rejects_negative_page() {
        let err = PageRequest::validate("todo_search", PaginationInput { count: 3, page: -1 })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("todo_search"));
        assert!(err.to_string().contains("page"));
    }

    #[test]
    fn test_validate_accepts_minimum() {
        let req =
            PageRequest::validate("todo_pages", PaginationInput { count: 1, page: 1 }).unwrap();
        assert_eq!(req, PageRequest { count: 1, page: 1 });
    }
}
