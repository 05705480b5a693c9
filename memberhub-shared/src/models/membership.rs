//! Membership model and database operations
//!
//! A membership is a time-bounded subscription period owned by exactly one
//! member. Dates are stored as `TIMESTAMPTZ` instants (local midnight of the
//! requested day, normalized to UTC).
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE memberships (
//!     id SERIAL PRIMARY KEY,
//!     start_date TIMESTAMPTZ NOT NULL,
//!     end_date TIMESTAMPTZ NOT NULL,
//!     member_id INTEGER NOT NULL REFERENCES members(id) ON DELETE CASCADE
//! );
//! ```
//!
//! Deleting a member removes its memberships with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::member::Member;
use crate::pagination::PageRequest;

/// Membership row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    /// Generated membership ID
    pub id: i32,

    /// First day of the membership (local midnight, stored as UTC)
    pub start_date: DateTime<Utc>,

    /// Last day of the membership (local midnight, stored as UTC)
    pub end_date: DateTime<Utc>,

    /// Owning member
    pub member_id: i32,
}

/// A membership together with the member that owns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipWithMember {
    #[serde(flatten)]
    pub membership: Membership,

    pub member: Member,
}

/// Input for creating a new membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    pub member_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Input for updating a membership
///
/// Only `Some` fields are written; `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMembership {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl UpdateMembership {
    /// True when there is nothing to write
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }

    /// Applies the supplied fields to a membership in place
    pub fn apply_to(&self, membership: &mut Membership) {
        if let Some(start_date) = self.start_date {
            membership.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            membership.end_date = end_date;
        }
    }
}

impl Membership {
    /// Inserts a new membership for an existing member
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if `member_id` does not reference a
    /// member, or an error if the connection fails
    pub async fn create(pool: &PgPool, data: CreateMembership) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (start_date, end_date, member_id)
            VALUES ($1, $2, $3)
            RETURNING id, start_date, end_date, member_id
            "#,
        )
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.member_id)
        .fetch_one(pool)
        .await?;

        Ok(membership)
    }

    /// Finds a membership by ID, without its member
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, start_date, end_date, member_id
            FROM memberships
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Finds a membership by ID together with its member
    pub async fn find_with_member(
        pool: &PgPool,
        id: i32,
    ) -> Result<Option<MembershipWithMember>, sqlx::Error> {
        let Some(membership) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        Self::attach_member(pool, membership).await
    }

    /// Lists all memberships of one member, oldest first
    pub async fn list_by_member(pool: &PgPool, member_id: i32) -> Result<Vec<Self>, sqlx::Error> {
        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, start_date, end_date, member_id
            FROM memberships
            WHERE member_id = $1
            ORDER BY id
            "#,
        )
        .bind(member_id)
        .fetch_all(pool)
        .await?;

        Ok(memberships)
    }

    /// Lists all memberships belonging to any of `member_ids`
    pub async fn list_by_members(
        pool: &PgPool,
        member_ids: &[i32],
    ) -> Result<Vec<Self>, sqlx::Error> {
        if member_ids.is_empty() {
            return Ok(Vec::new());
        }

        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, start_date, end_date, member_id
            FROM memberships
            WHERE member_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(member_ids)
        .fetch_all(pool)
        .await?;

        Ok(memberships)
    }

    /// Lists one page of memberships, each with its member
    ///
    /// The sort column comes from the allow-listed [`PageRequest::sort`].
    pub async fn list(
        pool: &PgPool,
        request: &PageRequest,
    ) -> Result<Vec<MembershipWithMember>, sqlx::Error> {
        let query = format!(
            "SELECT id, start_date, end_date, member_id FROM memberships \
             ORDER BY {} {}, id ASC LIMIT $1 OFFSET $2",
            request.sort.column,
            request.order.as_sql(),
        );

        let memberships = sqlx::query_as::<_, Membership>(&query)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(pool)
            .await?;

        let mut member_ids: Vec<i32> = memberships.iter().map(|ms| ms.member_id).collect();
        member_ids.sort_unstable();
        member_ids.dedup();

        let members = Member::find_by_ids(pool, &member_ids).await?;

        // Every membership references a member; rows whose member vanished
        // between the two queries are dropped
        Ok(memberships
            .into_iter()
            .filter_map(|membership| {
                members
                    .iter()
                    .find(|m| m.id == membership.member_id)
                    .cloned()
                    .map(|member| MembershipWithMember { membership, member })
            })
            .collect())
    }

    /// Updates the supplied dates of a membership
    ///
    /// # Returns
    ///
    /// The updated membership with its member, or `None` if no membership
    /// has this ID
    pub async fn update(
        pool: &PgPool,
        id: i32,
        data: UpdateMembership,
    ) -> Result<Option<MembershipWithMember>, sqlx::Error> {
        let updated = sqlx::query_as::<_, Membership>(
            r#"
            UPDATE memberships
            SET start_date = COALESCE($2, start_date),
                end_date = COALESCE($3, end_date)
            WHERE id = $1
            RETURNING id, start_date, end_date, member_id
            "#,
        )
        .bind(id)
        .bind(data.start_date)
        .bind(data.end_date)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(membership) => Self::attach_member(pool, membership).await,
            None => Ok(None),
        }
    }

    /// Deletes a membership
    ///
    /// # Returns
    ///
    /// The deleted membership with its member, or `None` if no membership
    /// has this ID
    pub async fn delete(
        pool: &PgPool,
        id: i32,
    ) -> Result<Option<MembershipWithMember>, sqlx::Error> {
        let Some(existing) = Self::find_with_member(pool, id).await? else {
            return Ok(None);
        };

        let result = sqlx::query("DELETE FROM memberships WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(existing))
    }

    async fn attach_member(
        pool: &PgPool,
        membership: Membership,
    ) -> Result<Option<MembershipWithMember>, sqlx::Error> {
        let member = Member::find_by_id(pool, membership.member_id).await?;

        Ok(member.map(|member| MembershipWithMember { membership, member }))
    }
}
