//! API route definitions.

use axum::{Json, Router, http::StatusCode, middleware, response::IntoResponse};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::{AuthUser, auth::auth_middleware}};
use hearth_db::{HouseholdError, HouseholdRepository};

pub mod budgets;
pub mod categories;
pub mod health;
pub mod members;
pub mod transactions;

/// Creates the API router with all routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(budgets::routes())
        .merge(categories::routes())
        .merge(members::routes())
        .merge(transactions::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new().merge(health::routes()).merge(protected_routes)
}

/// Resolves the authenticated user to their household, or produces the
/// error response to return as-is.
pub(crate) async fn resolve_household(
    state: &AppState,
    auth: &AuthUser,
) -> Result<Uuid, axum::response::Response> {
    let repo = HouseholdRepository::new((*state.db).clone());

    match repo.find_by_user(auth.user_id()).await {
        Ok(household) => Ok(household.id),
        Err(e) => Err(household_error_response(&e)),
    }
}

/// Maps household resolution errors to HTTP responses.
fn household_error_response(e: &HouseholdError) -> axum::response::Response {
    match e {
        HouseholdError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "no_household",
                "message": "No household is associated with this account"
            })),
        )
            .into_response(),
        HouseholdError::Database(err) => {
            error!(error = %err, "Failed to resolve household");
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

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_missing_household_is_not_found() {
        let response = household_error_response(&HouseholdError::NotFound(Uuid::new_v4()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_database_error_is_internal() {
        let err = HouseholdError::Database(DbErr::Custom("boom".to_string()));
        let response = household_error_response(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
