//! Offset pagination for listing endpoints
//!
//! Query parameters arrive as loose strings. Numbers are read leniently
//! (leading whitespace, an optional sign, then as many digits as are
//! present, so `"12abc"` reads as 12) and anything unreadable falls back to
//! the default.
//!
//! | Parameter  | Default | Bounds                                 |
//! |------------|---------|----------------------------------------|
//! | `page`     | 1       | at least 1                             |
//! | `pageSize` | 10      | 1..=50, zero or negative -> default    |
//! | `sortBy`   | entity  | allow-listed, see [`crate::validation::sort`] |
//! | `order`    | `asc`   | `desc` only when literally `"desc"`    |

use serde::{Deserialize, Serialize};

use crate::validation::sort::{resolve_sort_field, EntityKind, SortField, SortOrder};

/// Page used when none is requested
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when none (or a non-positive one) is requested
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a client may request
pub const MAX_PAGE_SIZE: i64 = 50;

/// Page details echoed back to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDetails {
    pub page: i64,
    pub page_size: i64,
}

/// A fully resolved listing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: i64,

    /// Records per page
    pub page_size: i64,

    /// Allow-listed sort field
    pub sort: SortField,

    /// Sort direction
    pub order: SortOrder,
}

impl PageRequest {
    /// Builds a page request from raw query parameters
    pub fn from_query(
        page: Option<&str>,
        page_size: Option<&str>,
        sort_by: Option<&str>,
        order: Option<&str>,
        kind: EntityKind,
    ) -> Self {
        let page = match page.and_then(leading_integer) {
            Some(n) if n != 0 => n.max(1),
            _ => DEFAULT_PAGE,
        };

        let page_size = match page_size.and_then(leading_integer) {
            Some(n) if n > 0 => n.min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };

        Self {
            page,
            page_size,
            sort: resolve_sort_field(sort_by, kind),
            order: SortOrder::from_query(order),
        }
    }

    /// Default page request for an entity
    pub fn first_page(kind: EntityKind) -> Self {
        Self::from_query(None, None, None, None, kind)
    }

    /// Number of records to skip
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Number of records to return
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn details(&self) -> PageDetails {
        PageDetails {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Reads the integer prefix of a string, if any
///
/// Digit runs too long for `i64` saturate to `i64::MAX` or `i64::MIN`.
fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    match rest[..digits_len].parse::<i64>() {
        Ok(n) => Some(sign * n),
        Err(_) if sign < 0 => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}
