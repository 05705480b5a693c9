//! API route handlers
//!
//! Handlers are organized by resource:
//!
//! - `health`: Health check endpoint
//! - `members`: Member CRUD under `/api/member`
//! - `memberships`: Membership CRUD under `/api/membership`

pub mod health;
pub mod members;
pub mod memberships;

use memberhub_shared::{models::EntityKind, pagination::PageRequest};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Listing query string (`?page&pageSize&sortBy&order`)
///
/// Values stay raw strings; anything unparseable falls back to the paging
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl ListQuery {
    pub fn page_request(&self, kind: EntityKind) -> PageRequest {
        PageRequest::from_query(
            self.page.as_deref(),
            self.page_size.as_deref(),
            self.sort_by.as_deref(),
            self.order.as_deref(),
            kind,
        )
    }
}

/// Parses a path ID into a positive integer
pub(crate) fn parse_id(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().filter(|id| *id > 0)
}

/// Treats empty strings the same as an absent field
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Reads any JSON scalar as text so non-string dates reach date validation
///
/// `null` becomes `None`; numbers and booleans keep their JSON spelling.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        Value::String(s) => s,
        other => other.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id(" 7 "), Some(7));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("-3"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("99999999999"), None);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("a".to_string())), Some("a".to_string()));
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_list_query_defaults() {
        let request = ListQuery::default().page_request(EntityKind::Member);
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 10);
        assert_eq!(request.sort.key, "name");
    }

    #[test]
    fn test_list_query_membership_sort() {
        let query = ListQuery {
            page: Some("2".to_string()),
            page_size: Some("100".to_string()),
            sort_by: Some("startDate".to_string()),
            order: Some("desc".to_string()),
        };
        let request = query.page_request(EntityKind::Membership);
        assert_eq!(request.page, 2);
        assert_eq!(request.page_size, 50);
        assert_eq!(request.sort.column, "start_date");
    }

    #[derive(Debug, Deserialize)]
    struct DateBody {
        #[serde(default, deserialize_with = "lenient_string")]
        date: Option<String>,
    }

    #[test]
    fn test_lenient_string() {
        let parse = |json: &str| serde_json::from_str::<DateBody>(json).unwrap().date;

        assert_eq!(parse(r#"{"date": "2030-01-01"}"#), Some("2030-01-01".to_string()));
        assert_eq!(parse(r#"{"date": 20300101}"#), Some("20300101".to_string()));
        assert_eq!(parse(r#"{"date": true}"#), Some("true".to_string()));
        assert_eq!(parse(r#"{"date": null}"#), None);
        assert_eq!(parse("{}"), None);
    }
}
