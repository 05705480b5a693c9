//! Member endpoints
//!
//! # Endpoints
//!
//! - `POST /api/member` - Create member
//! - `GET /api/member` - List members (paginated)
//! - `GET /api/member/:id` - Get member with memberships
//! - `PUT /api/member/:id` - Update name and/or email
//! - `DELETE /api/member/:id` - Delete member and its memberships

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{non_empty, parse_id, ListQuery},
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
    models::{CreateMember, EntityKind, Member, MemberWithMemberships, UpdateMember},
    pagination::PageDetails,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create member request
#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,

    #[validate(required, length(min = 1))]
    pub email: Option<String>,
}

/// Update member request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    pub new_name: Option<String>,
    pub new_email: Option<String>,
}

/// Create member response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberResponse {
    pub success: bool,
    pub message: String,
    pub new_member: Member,
}

/// Single member response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMemberResponse {
    pub success: bool,
    pub message: String,
    pub member: MemberWithMemberships,
}

/// Member page response
///
/// An empty page carries only `success: false` and the message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMembersResponse {
    pub success: bool,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_details: Option<PageDetails>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<MemberWithMemberships>>,
}

/// Update member response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberResponse {
    pub success: bool,
    pub message: String,
    pub updated_member: MemberWithMemberships,
}

/// Delete member response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMemberResponse {
    pub success: bool,
    pub message: String,
    pub deleted_member: MemberWithMemberships,
}

fn member_not_found(raw_id: &str) -> ApiError {
    ApiError::NotFound(format!("Member with ID {} not found.", raw_id))
}

/// Create member
///
/// # Endpoint
///
/// ```text
/// POST /api/member
/// Content-Type: application/json
///
/// { "name": "Ada", "email": "ada@example.com" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "message": "Member created successfully",
///   "newMember": { "id": 1, "name": "Ada", "email": "ada@example.com" }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `name` or `email` missing or empty
/// - `500 Internal Server Error`: Server error
pub async fn add_member(
    State(state): State<AppState>,
    payload: Result<Json<AddMemberRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AddMemberResponse>)> {
    let Json(req) = payload?;

    let invalid = || ApiError::BadRequest("Name and email must not be empty.".to_string());

    req.validate().map_err(|_| invalid())?;
    let (Some(name), Some(email)) = (req.name, req.email) else {
        return Err(invalid());
    };

    let member = state
        .members
        .create_member(CreateMember { name, email })
        .await?;

    tracing::info!(member_id = member.id, "Member created");

    Ok((
        StatusCode::CREATED,
        Json(AddMemberResponse {
            success: true,
            message: "Member created successfully".to_string(),
            new_member: member,
        }),
    ))
}

/// Get member with memberships
///
/// # Errors
///
/// - `404 Not Found`: No member with this ID, or the ID is not a number
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<GetMemberResponse>> {
    let no_match = || ApiError::NotFound("No member matched".to_string());

    let id = parse_id(&id).ok_or_else(no_match)?;
    let member = state.members.find_member(id).await?.ok_or_else(no_match)?;

    Ok(Json(GetMemberResponse {
        success: true,
        message: "Member/s fetched successfully".to_string(),
        member,
    }))
}

/// List members
///
/// # Endpoint
///
/// ```text
/// GET /api/member?page=1&pageSize=10&sortBy=email&order=desc
/// ```
///
/// `sortBy` accepts `name`, `email` or `id` (default `name`). `pageSize` is
/// capped at 50.
pub async fn list_members(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<ListMembersResponse>> {
    let Query(query) = query?;
    let request = query.page_request(EntityKind::Member);

    let members = state.members.list_members(&request).await?;

    if members.is_empty() {
        return Ok(Json(ListMembersResponse {
            success: false,
            message: "members empty".to_string(),
            page_details: None,
            members: None,
        }));
    }

    Ok(Json(ListMembersResponse {
        success: true,
        message: "Member/s fetched successfully".to_string(),
        page_details: Some(request.details()),
        members: Some(members),
    }))
}

/// Update member
///
/// # Endpoint
///
/// ```text
/// PUT /api/member/:id
/// Content-Type: application/json
///
/// { "newName": "Ada Lovelace" }
/// ```
///
/// Empty strings count as not supplied; the stored value is kept.
///
/// # Errors
///
/// - `400 Bad Request`: Neither `newName` nor `newEmail` supplied
/// - `404 Not Found`: Member not found
pub async fn update_member(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateMemberRequest>, JsonRejection>,
) -> ApiResult<Json<UpdateMemberResponse>> {
    let Json(req) = payload?;

    let update = UpdateMember {
        name: non_empty(req.new_name),
        email: non_empty(req.new_email),
    };

    if update.is_empty() {
        return Err(ApiError::BadRequest(
            "Name or email must not be empty.".to_string(),
        ));
    }

    let id = parse_id(&raw_id).ok_or_else(|| member_not_found(&raw_id))?;
    let updated_member = state.members.update_member(id, update).await?;

    Ok(Json(UpdateMemberResponse {
        success: true,
        message: "Member updated successfully".to_string(),
        updated_member,
    }))
}

/// Delete member
///
/// Memberships owned by the member are removed with it and returned in the
/// response.
///
/// # Errors
///
/// - `404 Not Found`: Member not found
pub async fn delete_member(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<DeleteMemberResponse>> {
    let id = parse_id(&raw_id).ok_or_else(|| member_not_found(&raw_id))?;
    let deleted_member = state.members.delete_member(id).await?;

    tracing::info!(
        member_id = id,
        memberships = deleted_member.memberships.len(),
        "Member deleted"
    );

    Ok(Json(DeleteMemberResponse {
        success: true,
        message: "Member deleted successfully".to_string(),
        deleted_member,
    }))
}
