//! In-process store
//!
//! Implements both repository traits over plain maps behind a tokio
//! `RwLock`. It mirrors the PostgreSQL schema rules that matter to callers:
//! generated IDs start at 1, inserting a membership requires an existing
//! member, and deleting a member cascades to its memberships. Sorting and
//! paging follow the same allow-listed fields with ID as the tie-breaker.
//!
//! Used by the API integration tests and handy for local experiments.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{MemberRepository, MembershipRepository, RepositoryError, RepositoryResult};
use crate::models::{
    CreateMember, CreateMembership, EntityKind, Member, MemberWithMemberships, Membership,
    MembershipWithMember, UpdateMember, UpdateMembership,
};
use crate::pagination::PageRequest;
use crate::validation::sort::SortOrder;

#[derive(Debug, Default)]
struct Tables {
    members: BTreeMap<i32, Member>,
    memberships: BTreeMap<i32, Membership>,
    last_member_id: i32,
    last_membership_id: i32,
}

impl Tables {
    fn memberships_of(&self, member_id: i32) -> Vec<Membership> {
        self.memberships
            .values()
            .filter(|ms| ms.member_id == member_id)
            .cloned()
            .collect()
    }

    fn member_with_memberships(&self, id: i32) -> Option<MemberWithMemberships> {
        let member = self.members.get(&id)?.clone();
        Some(MemberWithMemberships {
            memberships: self.memberships_of(id),
            member,
        })
    }

    fn membership_with_member(&self, id: i32) -> Option<MembershipWithMember> {
        let membership = self.memberships.get(&id)?.clone();
        let member = self.members.get(&membership.member_id)?.clone();
        Some(MembershipWithMember { membership, member })
    }
}

/// Store holding everything in memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Applies direction to a primary ordering and breaks ties by ascending ID
fn order_by(primary: Ordering, order: SortOrder, left_id: i32, right_id: i32) -> Ordering {
    let primary = match order {
        SortOrder::Asc => primary,
        SortOrder::Desc => primary.reverse(),
    };
    primary.then(left_id.cmp(&right_id))
}

fn page<T>(rows: Vec<T>, request: &PageRequest) -> Vec<T> {
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(request.limit()).unwrap_or(0);
    rows.into_iter().skip(offset).take(limit).collect()
}

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn create_member(&self, data: CreateMember) -> RepositoryResult<Member> {
        let mut tables = self.tables.write().await;
        tables.last_member_id += 1;

        let member = Member {
            id: tables.last_member_id,
            name: data.name,
            email: data.email,
        };
        tables.members.insert(member.id, member.clone());

        Ok(member)
    }

    async fn find_member(&self, id: i32) -> RepositoryResult<Option<MemberWithMemberships>> {
        Ok(self.tables.read().await.member_with_memberships(id))
    }

    async fn list_members(
        &self,
        request: &PageRequest,
    ) -> RepositoryResult<Vec<MemberWithMemberships>> {
        let tables = self.tables.read().await;

        let mut members: Vec<&Member> = tables.members.values().collect();
        members.sort_by(|a, b| {
            let primary = match request.sort.key {
                "email" => a.email.cmp(&b.email),
                "id" => a.id.cmp(&b.id),
                _ => a.name.cmp(&b.name),
            };
            order_by(primary, request.order, a.id, b.id)
        });

        let ids: Vec<i32> = members.iter().map(|m| m.id).collect();
        Ok(page(ids, request)
            .into_iter()
            .filter_map(|id| tables.member_with_memberships(id))
            .collect())
    }

    async fn update_member(
        &self,
        id: i32,
        data: UpdateMember,
    ) -> RepositoryResult<MemberWithMemberships> {
        let mut tables = self.tables.write().await;

        let member = tables
            .members
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Member, id))?;
        data.apply_to(member);

        tables
            .member_with_memberships(id)
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Member, id))
    }

    async fn delete_member(&self, id: i32) -> RepositoryResult<MemberWithMemberships> {
        let mut tables = self.tables.write().await;

        let deleted = tables
            .member_with_memberships(id)
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Member, id))?;

        tables.members.remove(&id);
        tables.memberships.retain(|_, ms| ms.member_id != id);

        Ok(deleted)
    }
}

#[async_trait]
impl MembershipRepository for InMemoryStore {
    async fn create_membership(
        &self,
        data: CreateMembership,
    ) -> RepositoryResult<MembershipWithMember> {
        let mut tables = self.tables.write().await;

        let member = tables
            .members
            .get(&data.member_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Member, data.member_id))?;

        tables.last_membership_id += 1;
        let membership = Membership {
            id: tables.last_membership_id,
            start_date: data.start_date,
            end_date: data.end_date,
            member_id: data.member_id,
        };
        tables.memberships.insert(membership.id, membership.clone());

        Ok(MembershipWithMember { membership, member })
    }

    async fn find_membership(&self, id: i32) -> RepositoryResult<Option<MembershipWithMember>> {
        Ok(self.tables.read().await.membership_with_member(id))
    }

    async fn list_memberships(
        &self,
        request: &PageRequest,
    ) -> RepositoryResult<Vec<MembershipWithMember>> {
        let tables = self.tables.read().await;

        let mut memberships: Vec<&Membership> = tables.memberships.values().collect();
        memberships.sort_by(|a, b| {
            let primary = match request.sort.key {
                "startDate" => a.start_date.cmp(&b.start_date),
                "id" => a.id.cmp(&b.id),
                _ => a.end_date.cmp(&b.end_date),
            };
            order_by(primary, request.order, a.id, b.id)
        });

        let ids: Vec<i32> = memberships.iter().map(|ms| ms.id).collect();
        Ok(page(ids, request)
            .into_iter()
            .filter_map(|id| tables.membership_with_member(id))
            .collect())
    }

    async fn update_membership(
        &self,
        id: i32,
        data: UpdateMembership,
    ) -> RepositoryResult<MembershipWithMember> {
        let mut tables = self.tables.write().await;

        let membership = tables
            .memberships
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Membership, id))?;
        data.apply_to(membership);

        tables
            .membership_with_member(id)
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Membership, id))
    }

    async fn delete_membership(&self, id: i32) -> RepositoryResult<MembershipWithMember> {
        let mut tables = self.tables.write().await;

        let deleted = tables
            .membership_with_member(id)
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Membership, id))?;
        tables.memberships.remove(&id);

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryErrorKind;
    use chrono::{Duration, TimeZone, Utc};

    async fn add_member(store: &InMemoryStore, name: &str, email: &str) -> Member {
        store
            .create_member(CreateMember {
                name: name.to_string(),
                email: email.to_string(),
            })
            .await
            .unwrap()
    }

    async fn add_membership(store: &InMemoryStore, member_id: i32, start_day: i64) -> Membership {
        let start = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap() + Duration::days(start_day);
        store
            .create_membership(CreateMembership {
                member_id,
                start_date: start,
                end_date: start + Duration::days(30),
            })
            .await
            .unwrap()
            .membership
    }

    fn member_page(sort_by: Option<&str>, order: Option<&str>) -> PageRequest {
        PageRequest::from_query(None, None, sort_by, order, EntityKind::Member)
    }

    #[tokio::test]
    async fn test_ids_are_generated_sequentially() {
        let store = InMemoryStore::new();
        assert_eq!(add_member(&store, "Ann", "a@x.com").await.id, 1);
        assert_eq!(add_member(&store, "Bo", "b@x.com").await.id, 2);
    }

    #[tokio::test]
    async fn test_membership_requires_existing_member() {
        let store = InMemoryStore::new();

        let err = store
            .create_membership(CreateMembership {
                member_id: 99,
                start_date: Utc::now(),
                end_date: Utc::now(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), RepositoryErrorKind::NotFound);
        assert_eq!(err.to_string(), "Member with ID 99 not found.");
    }

    #[tokio::test]
    async fn test_delete_member_cascades() {
        let store = InMemoryStore::new();
        let ann = add_member(&store, "Ann", "a@x.com").await;
        let first = add_membership(&store, ann.id, 0).await;
        add_membership(&store, ann.id, 10).await;

        let deleted = store.delete_member(ann.id).await.unwrap();
        assert_eq!(deleted.memberships.len(), 2);

        assert!(store.find_member(ann.id).await.unwrap().is_none());
        assert!(store.find_membership(first.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_members_sorted_and_paged() {
        let store = InMemoryStore::new();
        add_member(&store, "Cy", "c@x.com").await;
        add_member(&store, "Ann", "z@x.com").await;
        add_member(&store, "Bo", "b@x.com").await;

        let names: Vec<String> = store
            .list_members(&member_page(None, None))
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.member.name)
            .collect();
        assert_eq!(names, ["Ann", "Bo", "Cy"]);

        let emails: Vec<String> = store
            .list_members(&member_page(Some("email"), Some("desc")))
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.member.email)
            .collect();
        assert_eq!(emails, ["z@x.com", "c@x.com", "b@x.com"]);

        let second_page = PageRequest::from_query(
            Some("2"),
            Some("2"),
            Some("id"),
            None,
            EntityKind::Member,
        );
        let rest = store.list_members(&second_page).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].member.id, 3);
    }

    #[tokio::test]
    async fn test_list_memberships_defaults_to_end_date() {
        let store = InMemoryStore::new();
        let ann = add_member(&store, "Ann", "a@x.com").await;
        let late = add_membership(&store, ann.id, 50).await;
        let early = add_membership(&store, ann.id, 5).await;

        let listed = store
            .list_memberships(&PageRequest::first_page(EntityKind::Membership))
            .await
            .unwrap();

        let ids: Vec<i32> = listed.iter().map(|ms| ms.membership.id).collect();
        assert_eq!(ids, [early.id, late.id]);
        assert_eq!(listed[0].member, ann);
    }

    #[tokio::test]
    async fn test_update_member_keeps_other_field() {
        let store = InMemoryStore::new();
        let ann = add_member(&store, "Ann", "a@x.com").await;

        let updated = store
            .update_member(
                ann.id,
                UpdateMember {
                    name: Some("Annie".to_string()),
                    email: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.member.name, "Annie");
        assert_eq!(updated.member.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_update_missing_records_is_not_found() {
        let store = InMemoryStore::new();

        let err = store
            .update_member(5, UpdateMember::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), RepositoryErrorKind::NotFound);

        let err = store
            .update_membership(5, UpdateMembership::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Membership with ID 5 not found.");
    }
}
