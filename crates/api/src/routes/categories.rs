//! Category management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::resolve_household};
use hearth_db::{CategoryError, CategoryRepository};

/// Creates the category routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{category_id}",
            axum::routing::patch(rename_category).delete(delete_category),
        )
}

/// Request body for creating or renaming a category.
#[derive(Debug, Deserialize)]
pub struct CategoryNameRequest {
    /// Category name, unique per household ignoring case.
    pub name: String,
}

/// POST `/categories` - Create a category.
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CategoryNameRequest>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = CategoryRepository::new((*state.db).clone());

    match repo.create(household_id, &payload.name).await {
        Ok(category) => {
            info!(household_id = %household_id, category_id = %category.id, "Category created");
            (StatusCode::CREATED, Json(json!(category))).into_response()
        }
        Err(e) => map_category_error(&e),
    }
}

/// GET `/categories` - List the household's categories.
async fn list_categories(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = CategoryRepository::new((*state.db).clone());

    match repo.list(household_id).await {
        Ok(categories) => (StatusCode::OK, Json(json!({ "categories": categories }))).into_response(),
        Err(e) => map_category_error(&e),
    }
}

/// PATCH `/categories/{category_id}` - Rename a category.
async fn rename_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<CategoryNameRequest>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = CategoryRepository::new((*state.db).clone());

    match repo.rename(household_id, category_id, &payload.name).await {
        Ok(category) => (StatusCode::OK, Json(json!(category))).into_response(),
        Err(e) => map_category_error(&e),
    }
}

/// DELETE `/categories/{category_id}` - Delete an unused category.
async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_id): Path<Uuid>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = CategoryRepository::new((*state.db).clone());

    match repo.delete(household_id, category_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_category_error(&e),
    }
}

/// Maps category errors to HTTP responses.
fn map_category_error(e: &CategoryError) -> axum::response::Response {
    match e {
        CategoryError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Category not found: {id}")
            })),
        )
            .into_response(),
        CategoryError::DuplicateName(name) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_name",
                "message": format!("Category name '{name}' already exists")
            })),
        )
            .into_response(),
        CategoryError::EmptyName => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_payload",
                "message": "Category name must not be empty"
            })),
        )
            .into_response(),
        CategoryError::InUse => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "category_in_use",
                "message": "Category is in use and cannot be deleted"
            })),
        )
            .into_response(),
        CategoryError::Database(err) => {
            error!(error = %err, "Category operation failed");
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
