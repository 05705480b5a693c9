//! Member model and database operations
//!
//! A member is a person record that owns zero or more memberships.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE members (
//!     id SERIAL PRIMARY KEY,
//!     name TEXT NOT NULL CHECK (name <> ''),
//!     email TEXT NOT NULL CHECK (email <> '')
//! );
//! ```
//!
//! # Example
//!
//! ```ignore
//! use memberhub_shared::models::member::{CreateMember, Member};
//!
//! let member = Member::create(&pool, CreateMember {
//!     name: "Ann".to_string(),
//!     email: "ann@example.com".to_string(),
//! }).await?;
//!
//! let with_memberships = Member::find_with_memberships(&pool, member.id).await?;
//! ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;

use super::membership::Membership;
use crate::pagination::PageRequest;

/// Member row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Generated member ID
    pub id: i32,

    /// Display name, never empty
    pub name: String,

    /// Contact email, never empty
    pub email: String,
}

/// A member together with all of its memberships
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberWithMemberships {
    #[serde(flatten)]
    pub member: Member,

    pub memberships: Vec<Membership>,
}

/// Input for creating a new member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMember {
    pub name: String,
    pub email: String,
}

/// Input for updating a member
///
/// Only `Some` fields are written; `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMember {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UpdateMember {
    /// True when there is nothing to write
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    /// Applies the supplied fields to a member in place
    pub fn apply_to(&self, member: &mut Member) {
        if let Some(name) = &self.name {
            member.name = name.clone();
        }
        if let Some(email) = &self.email {
            member.email = email.clone();
        }
    }
}

impl Member {
    /// Inserts a new member and returns it with its generated ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database rejects the row (for example an
    /// empty name violating the check constraint) or the connection fails
    pub async fn create(pool: &PgPool, data: CreateMember) -> Result<Self, sqlx::Error> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .fetch_one(pool)
        .await?;

        Ok(member)
    }

    /// Finds a member by ID, without memberships
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, name, email
            FROM members
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    /// Finds all members whose ID is in `ids`
    ///
    /// Missing IDs are skipped. Order is by ID.
    pub async fn find_by_ids(pool: &PgPool, ids: &[i32]) -> Result<Vec<Self>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, name, email
            FROM members
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Finds a member by ID together with its memberships
    pub async fn find_with_memberships(
        pool: &PgPool,
        id: i32,
    ) -> Result<Option<MemberWithMemberships>, sqlx::Error> {
        let Some(member) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let memberships = Membership::list_by_member(pool, member.id).await?;

        Ok(Some(MemberWithMemberships {
            member,
            memberships,
        }))
    }

    /// Lists one page of members, each with its memberships
    ///
    /// The sort column comes from the allow-listed [`PageRequest::sort`] and
    /// is the only piece of SQL built at runtime. Ties are broken by ID so
    /// paging is stable.
    pub async fn list(
        pool: &PgPool,
        request: &PageRequest,
    ) -> Result<Vec<MemberWithMemberships>, sqlx::Error> {
        let query = format!(
            "SELECT id, name, email FROM members ORDER BY {} {}, id ASC LIMIT $1 OFFSET $2",
            request.sort.column,
            request.order.as_sql(),
        );

        let members = sqlx::query_as::<_, Member>(&query)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(pool)
            .await?;

        let ids: Vec<i32> = members.iter().map(|m| m.id).collect();
        let mut by_member: HashMap<i32, Vec<Membership>> = HashMap::new();
        for membership in Membership::list_by_members(pool, &ids).await? {
            by_member
                .entry(membership.member_id)
                .or_default()
                .push(membership);
        }

        Ok(members
            .into_iter()
            .map(|member| {
                let memberships = by_member.remove(&member.id).unwrap_or_default();
                MemberWithMemberships {
                    member,
                    memberships,
                }
            })
            .collect())
    }

    /// Updates the supplied fields of a member
    ///
    /// # Returns
    ///
    /// The updated member with its memberships, or `None` if no member has
    /// this ID
    pub async fn update(
        pool: &PgPool,
        id: i32,
        data: UpdateMember,
    ) -> Result<Option<MemberWithMemberships>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_with_memberships(pool, id).await;
        }

        // Build dynamic update query based on which fields are present
        let mut assignments = Vec::new();
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            assignments.push(format!("name = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            assignments.push(format!("email = ${}", bind_count));
        }

        let query = format!(
            "UPDATE members SET {} WHERE id = $1 RETURNING id, name, email",
            assignments.join(", ")
        );

        let mut q = sqlx::query_as::<_, Member>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }

        let Some(member) = q.fetch_optional(pool).await? else {
            return Ok(None);
        };

        let memberships = Membership::list_by_member(pool, member.id).await?;

        Ok(Some(MemberWithMemberships {
            member,
            memberships,
        }))
    }

    /// Deletes a member and, through `ON DELETE CASCADE`, its memberships
    ///
    /// The member and its memberships are read first so the caller can
    /// report what was removed.
    ///
    /// # Returns
    ///
    /// The deleted member with the memberships removed alongside it, or
    /// `None` if no member has this ID
    pub async fn delete(
        pool: &PgPool,
        id: i32,
    ) -> Result<Option<MemberWithMemberships>, sqlx::Error> {
        let Some(existing) = Self::find_with_memberships(pool, id).await? else {
            return Ok(None);
        };

        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(existing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ann() -> Member {
        Member {
            id: 1,
            name: "Ann".to_string(),
            email: "a@x.com".to_string(),
        }
    }

    #[test]
    fn test_update_member_applies_only_supplied_fields() {
        let mut member = ann();
        UpdateMember {
            name: None,
            email: Some("ann@example.com".to_string()),
        }
        .apply_to(&mut member);

        assert_eq!(member.name, "Ann");
        assert_eq!(member.email, "ann@example.com");
    }

    #[test]
    fn test_update_member_is_empty() {
        assert!(UpdateMember::default().is_empty());
        assert!(!UpdateMember {
            name: Some("Bo".to_string()),
            email: None
        }
        .is_empty());
    }

    #[test]
    fn test_member_with_memberships_serializes_flat() {
        let start = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2030, 2, 1, 0, 0, 0).unwrap();

        let json = serde_json::to_value(MemberWithMemberships {
            member: ann(),
            memberships: vec![Membership {
                id: 7,
                start_date: start,
                end_date: end,
                member_id: 1,
            }],
        })
        .unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Ann");
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["memberships"][0]["id"], 7);
        assert_eq!(json["memberships"][0]["memberId"], 1);
        assert_eq!(json["memberships"][0]["startDate"], "2030-01-01T00:00:00Z");
    }
}
