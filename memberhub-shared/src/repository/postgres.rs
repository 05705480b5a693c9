//! PostgreSQL-backed repositories
//!
//! Thin adapter from the repository traits to the model queries in
//! [`crate::models`]. Absent rows become [`RepositoryError::NotFound`]; a
//! foreign key violation on membership insert means the member is missing.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error};

use super::{MemberRepository, MembershipRepository, RepositoryError, RepositoryResult};
use crate::db::pool::health_check;
use crate::models::{
    CreateMember, CreateMembership, EntityKind, Member, MemberWithMemberships, Membership,
    MembershipWithMember, UpdateMember, UpdateMembership,
};
use crate::pagination::PageRequest;

/// Store over a shared PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for shutdown and diagnostics
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Logs a store failure and wraps it
fn database_error(operation: &'static str, err: sqlx::Error) -> RepositoryError {
    error!(operation, error = %err, "Database operation failed");
    RepositoryError::Database(err)
}

#[async_trait]
impl MemberRepository for PgStore {
    async fn create_member(&self, data: CreateMember) -> RepositoryResult<Member> {
        let member = Member::create(&self.pool, data)
            .await
            .map_err(|e| database_error("create_member", e))?;

        debug!(member_id = member.id, "Member created");
        Ok(member)
    }

    async fn find_member(&self, id: i32) -> RepositoryResult<Option<MemberWithMemberships>> {
        Member::find_with_memberships(&self.pool, id)
            .await
            .map_err(|e| database_error("find_member", e))
    }

    async fn list_members(
        &self,
        request: &PageRequest,
    ) -> RepositoryResult<Vec<MemberWithMemberships>> {
        Member::list(&self.pool, request)
            .await
            .map_err(|e| database_error("list_members", e))
    }

    async fn update_member(
        &self,
        id: i32,
        data: UpdateMember,
    ) -> RepositoryResult<MemberWithMemberships> {
        Member::update(&self.pool, id, data)
            .await
            .map_err(|e| database_error("update_member", e))?
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Member, id))
    }

    async fn delete_member(&self, id: i32) -> RepositoryResult<MemberWithMemberships> {
        let deleted = Member::delete(&self.pool, id)
            .await
            .map_err(|e| database_error("delete_member", e))?
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Member, id))?;

        debug!(
            member_id = id,
            memberships = deleted.memberships.len(),
            "Member deleted"
        );
        Ok(deleted)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl MembershipRepository for PgStore {
    async fn create_membership(
        &self,
        data: CreateMembership,
    ) -> RepositoryResult<MembershipWithMember> {
        let member_id = data.member_id;

        let membership = match Membership::create(&self.pool, data).await {
            Ok(membership) => membership,
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                return Err(RepositoryError::not_found(EntityKind::Member, member_id));
            }
            Err(e) => return Err(database_error("create_membership", e)),
        };

        let member = Member::find_by_id(&self.pool, member_id)
            .await
            .map_err(|e| database_error("create_membership", e))?
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Member, member_id))?;

        debug!(membership_id = membership.id, member_id, "Membership created");
        Ok(MembershipWithMember { membership, member })
    }

    async fn find_membership(&self, id: i32) -> RepositoryResult<Option<MembershipWithMember>> {
        Membership::find_with_member(&self.pool, id)
            .await
            .map_err(|e| database_error("find_membership", e))
    }

    async fn list_memberships(
        &self,
        request: &PageRequest,
    ) -> RepositoryResult<Vec<MembershipWithMember>> {
        Membership::list(&self.pool, request)
            .await
            .map_err(|e| database_error("list_memberships", e))
    }

    async fn update_membership(
        &self,
        id: i32,
        data: UpdateMembership,
    ) -> RepositoryResult<MembershipWithMember> {
        Membership::update(&self.pool, id, data)
            .await
            .map_err(|e| database_error("update_membership", e))?
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Membership, id))
    }

    async fn delete_membership(&self, id: i32) -> RepositoryResult<MembershipWithMember> {
        let deleted = Membership::delete(&self.pool, id)
            .await
            .map_err(|e| database_error("delete_membership", e))?
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Membership, id))?;

        debug!(membership_id = id, "Membership deleted");
        Ok(deleted)
    }
}
