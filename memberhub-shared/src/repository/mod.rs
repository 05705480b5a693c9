//! Data-access ports for members and memberships
//!
//! Handlers depend on the [`MemberRepository`] and [`MembershipRepository`]
//! traits rather than on a concrete database handle. The store is built once
//! at startup and passed into the router state, so tests can swap in
//! [`memory::InMemoryStore`] for [`postgres::PgStore`].
//!
//! Both stores implement both traits. Method names carry the entity so a
//! single store value can serve as either trait object.
//!
//! # Errors
//!
//! Every operation returns [`RepositoryError`]. Callers branch on
//! [`RepositoryError::kind`], never on message text.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    CreateMember, CreateMembership, EntityKind, Member, MemberWithMemberships,
    MembershipWithMember, UpdateMember, UpdateMembership,
};
use crate::pagination::PageRequest;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Repository result type alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors raised by a repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The addressed record, or a record it must reference, does not exist
    #[error("{entity} with ID {id} not found.")]
    NotFound { entity: EntityKind, id: i32 },

    /// The store failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Coarse classification of a [`RepositoryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryErrorKind {
    NotFound,
    Unexpected,
}

impl RepositoryError {
    pub fn not_found(entity: EntityKind, id: i32) -> Self {
        RepositoryError::NotFound { entity, id }
    }

    pub fn kind(&self) -> RepositoryErrorKind {
        match self {
            RepositoryError::NotFound { .. } => RepositoryErrorKind::NotFound,
            RepositoryError::Database(_) => RepositoryErrorKind::Unexpected,
        }
    }
}

/// Member persistence
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Creates a member and returns it with its generated ID
    async fn create_member(&self, data: CreateMember) -> RepositoryResult<Member>;

    /// Finds a member with its memberships
    ///
    /// Returns `None` if not found.
    async fn find_member(&self, id: i32) -> RepositoryResult<Option<MemberWithMemberships>>;

    /// Lists one page of members with their memberships
    async fn list_members(
        &self,
        request: &PageRequest,
    ) -> RepositoryResult<Vec<MemberWithMemberships>>;

    /// Writes the supplied fields and returns the updated member
    ///
    /// # Errors
    ///
    /// - `NotFound` if no member has this ID
    async fn update_member(
        &self,
        id: i32,
        data: UpdateMember,
    ) -> RepositoryResult<MemberWithMemberships>;

    /// Deletes a member together with its memberships
    ///
    /// # Errors
    ///
    /// - `NotFound` if no member has this ID
    async fn delete_member(&self, id: i32) -> RepositoryResult<MemberWithMemberships>;

    /// Verifies the backing store is reachable
    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

/// Membership persistence
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Creates a membership for an existing member
    ///
    /// # Errors
    ///
    /// - `NotFound` (entity `Member`) if the member does not exist
    async fn create_membership(
        &self,
        data: CreateMembership,
    ) -> RepositoryResult<MembershipWithMember>;

    /// Finds a membership with its member
    ///
    /// Returns `None` if not found.
    async fn find_membership(&self, id: i32) -> RepositoryResult<Option<MembershipWithMember>>;

    /// Lists one page of memberships with their members
    async fn list_memberships(
        &self,
        request: &PageRequest,
    ) -> RepositoryResult<Vec<MembershipWithMember>>;

    /// Writes the supplied dates and returns the updated membership
    ///
    /// # Errors
    ///
    /// - `NotFound` if no membership has this ID
    async fn update_membership(
        &self,
        id: i32,
        data: UpdateMembership,
    ) -> RepositoryResult<MembershipWithMember>;

    /// Deletes a membership
    ///
    /// # Errors
    ///
    /// - `NotFound` if no membership has this ID
    async fn delete_membership(&self, id: i32) -> RepositoryResult<MembershipWithMember>;
}
