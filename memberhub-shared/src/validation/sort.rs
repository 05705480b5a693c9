//! Sort-field allow-lists
//!
//! Listing endpoints accept a client-supplied `sortBy` key. It is never
//! interpolated into SQL directly: the key is first resolved against a fixed
//! allow-list for the entity, and only the static column name paired with
//! the resolved field is used in the `ORDER BY` clause. Unknown or missing
//! keys silently fall back to the entity's default field.

use serde::{Deserialize, Serialize};

pub use crate::models::EntityKind;

/// A sortable field: the key clients send, and the column it maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField {
    /// Key as accepted in the `sortBy` query parameter
    pub key: &'static str,

    /// Column name used in generated SQL
    pub column: &'static str,
}

const MEMBER_SORT_FIELDS: &[SortField] = &[
    SortField { key: "name", column: "name" },
    SortField { key: "email", column: "email" },
    SortField { key: "id", column: "id" },
];

const MEMBERSHIP_SORT_FIELDS: &[SortField] = &[
    SortField { key: "startDate", column: "start_date" },
    SortField { key: "endDate", column: "end_date" },
    SortField { key: "id", column: "id" },
];

impl EntityKind {
    /// Fields this entity may be sorted by
    pub fn allowed_sort_fields(self) -> &'static [SortField] {
        match self {
            EntityKind::Member => MEMBER_SORT_FIELDS,
            EntityKind::Membership => MEMBERSHIP_SORT_FIELDS,
        }
    }

    /// Field used when the client asks for nothing or something unknown
    pub fn default_sort_field(self) -> SortField {
        match self {
            EntityKind::Member => MEMBER_SORT_FIELDS[0],
            EntityKind::Membership => MEMBERSHIP_SORT_FIELDS[1],
        }
    }
}

/// Resolves a requested sort key against the entity's allow-list
///
/// Matching is exact and case-sensitive.
pub fn resolve_sort_field(requested: Option<&str>, kind: EntityKind) -> SortField {
    requested
        .and_then(|key| {
            kind.allowed_sort_fields()
                .iter()
                .copied()
                .find(|field| field.key == key)
        })
        .unwrap_or_else(|| kind.default_sort_field())
}

/// Sort direction for listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `Desc` only for the literal string `"desc"`, `Asc` for anything else
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    /// SQL keyword for this direction
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}
