//! Household member routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::resolve_household};
use hearth_db::{MemberError, MemberRepository};

/// Creates the member routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/members", get(list_members).post(create_member))
        .route(
            "/members/{member_id}",
            axum::routing::patch(rename_member).delete(deactivate_member),
        )
}

/// Request body for creating or renaming a member.
#[derive(Debug, Deserialize)]
pub struct MemberNameRequest {
    /// Member's display name.
    pub full_name: String,
}

/// Query parameters for listing members.
#[derive(Debug, Deserialize)]
pub struct ListMembersQuery {
    /// Include deactivated members.
    #[serde(default)]
    pub include_inactive: bool,
}

/// POST `/members` - Add a member to the household.
async fn create_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<MemberNameRequest>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = MemberRepository::new((*state.db).clone());

    match repo.create(household_id, &payload.full_name).await {
        Ok(member) => {
            info!(household_id = %household_id, member_id = %member.id, "Member created");
            (StatusCode::CREATED, Json(json!(member))).into_response()
        }
        Err(e) => map_member_error(&e),
    }
}

/// GET `/members` - List the household's members.
async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListMembersQuery>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = MemberRepository::new((*state.db).clone());

    match repo.list(household_id, query.include_inactive).await {
        Ok(members) => (StatusCode::OK, Json(json!({ "members": members }))).into_response(),
        Err(e) => map_member_error(&e),
    }
}

/// PATCH `/members/{member_id}` - Rename a member.
async fn rename_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(member_id): Path<Uuid>,
    Json(payload): Json<MemberNameRequest>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = MemberRepository::new((*state.db).clone());

    match repo.rename(household_id, member_id, &payload.full_name).await {
        Ok(member) => (StatusCode::OK, Json(json!(member))).into_response(),
        Err(e) => map_member_error(&e),
    }
}

/// DELETE `/members/{member_id}` - Deactivate a member. Their income
/// history stays intact.
async fn deactivate_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(member_id): Path<Uuid>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = MemberRepository::new((*state.db).clone());

    match repo.deactivate(household_id, member_id).await {
        Ok(member) => {
            info!(household_id = %household_id, member_id = %member_id, "Member deactivated");
            (StatusCode::OK, Json(json!(member))).into_response()
        }
        Err(e) => map_member_error(&e),
    }
}

/// Maps member errors to HTTP responses.
fn map_member_error(e: &MemberError) -> axum::response::Response {
    match e {
        MemberError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Household member not found: {id}")
            })),
        )
            .into_response(),
        MemberError::EmptyName => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_payload",
                "message": "Member name must not be empty"
            })),
        )
            .into_response(),
        MemberError::Database(err) => {
            error!(error = %err, "Member operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}
