//! Membership endpoints
//!
//! # Endpoints
//!
//! - `POST /api/membership/:memberId` - Register a membership for a member
//! - `GET /api/membership` - List memberships (paginated)
//! - `GET /api/membership/:id` - Get membership with its member
//! - `PUT /api/membership/:id` - Update start and/or end date
//! - `DELETE /api/membership/:id` - Delete membership
//!
//! Dates are `YYYY-MM-DD` strings, read as local midnight, and may not lie
//! before today.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{lenient_string, non_empty, parse_id, ListQuery},
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use memberhub_shared::{
    models::{CreateMembership, EntityKind, MembershipWithMember, UpdateMembership},
    pagination::PageDetails,
    validation::date::{parse_membership_date, DATE_FORMAT_HINT},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create membership request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddMembershipRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(required, length(min = 1))]
    pub start_date: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(required, length(min = 1))]
    pub end_date: Option<String>,
}

/// Update membership request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMembershipRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_date: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub end_date: Option<String>,
}

/// Create membership response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMembershipResponse {
    pub success: bool,
    pub message: String,
    pub new_membership: MembershipWithMember,
}

/// Single membership response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMembershipResponse {
    pub success: bool,
    pub message: String,
    pub membership: MembershipWithMember,
}

/// Membership page response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMembershipsResponse {
    pub success: bool,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_details: Option<PageDetails>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub memberships: Option<Vec<MembershipWithMember>>,
}

/// Update membership response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMembershipResponse {
    pub success: bool,
    pub message: String,
    pub updated_membership: MembershipWithMember,
}

/// Delete membership response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMembershipResponse {
    pub success: bool,
    pub message: String,
    pub deleted_membership: MembershipWithMember,
}

fn membership_not_found(raw_id: &str) -> ApiError {
    ApiError::NotFound(format!("Membership with ID {} not found.", raw_id))
}

/// Register a membership for a member
///
/// # Endpoint
///
/// ```text
/// POST /api/membership/:memberId
/// Content-Type: application/json
///
/// { "startDate": "2026-11-01", "endDate": "2027-11-01" }
/// ```
///
/// # Response
///
/// `201 Created` with `newMembership`, the stored membership with its member
/// embedded.
///
/// # Errors
///
/// - `400 Bad Request`: Member ID invalid, a date missing, or a date
///   malformed or in the past
/// - `404 Not Found`: Member not found
pub async fn add_membership(
    State(state): State<AppState>,
    Path(raw_member_id): Path<String>,
    payload: Result<Json<AddMembershipRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AddMembershipResponse>)> {
    let Json(req) = payload?;

    let missing = || ApiError::BadRequest("fields missing or invalid.".to_string());

    let member_id = parse_id(&raw_member_id).ok_or_else(missing)?;
    req.validate().map_err(|_| missing())?;
    let (Some(start), Some(end)) = (req.start_date, req.end_date) else {
        return Err(missing());
    };

    let (Some(start_date), Some(end_date)) =
        (parse_membership_date(&start), parse_membership_date(&end))
    else {
        return Err(ApiError::BadRequest(format!(
            "Invalid date format. Expected format: {}",
            DATE_FORMAT_HINT
        )));
    };

    let new_membership = state
        .memberships
        .create_membership(CreateMembership {
            member_id,
            start_date,
            end_date,
        })
        .await?;

    tracing::info!(
        membership_id = new_membership.membership.id,
        member_id,
        "Membership registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(AddMembershipResponse {
            success: true,
            message: "Membership registered successfully".to_string(),
            new_membership,
        }),
    ))
}

/// Get membership with its member
///
/// # Errors
///
/// - `404 Not Found`: Membership not found
pub async fn get_membership(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<GetMembershipResponse>> {
    let not_found = || membership_not_found(&raw_id);

    let id = parse_id(&raw_id).ok_or_else(not_found)?;
    let membership = state
        .memberships
        .find_membership(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(GetMembershipResponse {
        success: true,
        message: "Membership fetched successfully".to_string(),
        membership,
    }))
}

/// List memberships
///
/// `sortBy` accepts `startDate`, `endDate` or `id` (default `endDate`).
pub async fn list_memberships(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<ListMembershipsResponse>> {
    let Query(query) = query?;
    let request = query.page_request(EntityKind::Membership);

    let memberships = state.memberships.list_memberships(&request).await?;

    if memberships.is_empty() {
        return Ok(Json(ListMembershipsResponse {
            success: false,
            message: "memberships empty".to_string(),
            page_details: None,
            memberships: None,
        }));
    }

    Ok(Json(ListMembershipsResponse {
        success: true,
        message: "Membership/s fetched successfully".to_string(),
        page_details: Some(request.details()),
        memberships: Some(memberships),
    }))
}

/// Update membership dates
///
/// Omitted or empty dates keep their stored value, so `{}` returns the
/// membership unchanged.
///
/// # Errors
///
/// - `400 Bad Request`: ID invalid, or a supplied date malformed or in the past
/// - `404 Not Found`: Membership not found
pub async fn update_membership(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateMembershipRequest>, JsonRejection>,
) -> ApiResult<Json<UpdateMembershipResponse>> {
    let id = parse_id(&raw_id)
        .ok_or_else(|| ApiError::BadRequest("membershipId is missing or invalid.".to_string()))?;
    let Json(req) = payload?;

    if state.memberships.find_membership(id).await?.is_none() {
        return Err(membership_not_found(&raw_id));
    }

    let update = UpdateMembership {
        start_date: validate_optional_date(req.start_date, "startDate")?,
        end_date: validate_optional_date(req.end_date, "endDate")?,
    };

    let updated_membership = state.memberships.update_membership(id, update).await?;

    Ok(Json(UpdateMembershipResponse {
        success: true,
        message: "Membership updated successfully".to_string(),
        updated_membership,
    }))
}

/// Delete membership
///
/// # Errors
///
/// - `404 Not Found`: Membership not found
pub async fn delete_membership(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<DeleteMembershipResponse>> {
    let id = parse_id(&raw_id).ok_or_else(|| membership_not_found(&raw_id))?;
    let deleted_membership = state.memberships.delete_membership(id).await?;

    tracing::info!(membership_id = id, "Membership deleted");

    Ok(Json(DeleteMembershipResponse {
        success: true,
        message: "Membership deleted successfully".to_string(),
        deleted_membership,
    }))
}

fn validate_optional_date(
    value: Option<String>,
    field: &str,
) -> ApiResult<Option<chrono::DateTime<chrono::Utc>>> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => parse_membership_date(&raw).map(Some).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "Invalid {} format. Expected format: {}",
                field, DATE_FORMAT_HINT
            ))
        }),
    }
}
