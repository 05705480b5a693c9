//! Database models for MemberHub
//!
//! Each model owns its row type, its input types, and the sqlx queries that
//! read and write it.
//!
//! # Models
//!
//! - `member`: people who hold memberships
//! - `membership`: time-bounded subscription periods, each owned by one member
//!
//! JSON field names are camelCase (`startDate`, `memberId`) to match the
//! HTTP API; database columns are snake_case.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod member;
pub mod membership;

pub use member::{CreateMember, Member, MemberWithMemberships, UpdateMember};
pub use membership::{CreateMembership, Membership, MembershipWithMember, UpdateMembership};

/// The kinds of record the API manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Member,
    Membership,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Member => "Member",
            EntityKind::Membership => "Membership",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
