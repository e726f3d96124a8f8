//! Transaction routes: recording and listing actual spend.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::resolve_household};
use hearth_db::{CreateTransactionInput, TransactionError, TransactionRepository};

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(create_transaction))
        .route("/transactions/{transaction_id}", delete(delete_transaction))
        .route(
            "/budgets/{budget_id}/transactions",
            get(list_budget_transactions),
        )
}

/// Request body for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Budget the spend belongs to.
    pub budget_id: Uuid,
    /// Category the spend counts against.
    pub category_id: Uuid,
    /// Amount spent.
    pub amount: Decimal,
    /// Date of the spend.
    pub transaction_date: NaiveDate,
    /// Optional note.
    pub note: Option<String>,
}

/// POST `/transactions` - Record a transaction.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = TransactionRepository::new((*state.db).clone());

    let input = CreateTransactionInput {
        budget_id: payload.budget_id,
        category_id: payload.category_id,
        amount: payload.amount,
        transaction_date: payload.transaction_date,
        note: payload.note,
    };

    match repo.create(household_id, input).await {
        Ok(transaction) => {
            info!(
                household_id = %household_id,
                transaction_id = %transaction.id,
                budget_id = %transaction.budget_id,
                "Transaction recorded"
            );
            (StatusCode::CREATED, Json(json!(transaction))).into_response()
        }
        Err(e) => map_transaction_error(&e),
    }
}

/// GET `/budgets/{budget_id}/transactions` - List a budget's transactions.
async fn list_budget_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = TransactionRepository::new((*state.db).clone());

    match repo.list_for_budget(household_id, budget_id).await {
        Ok(transactions) => {
            (StatusCode::OK, Json(json!({ "transactions": transactions }))).into_response()
        }
        Err(e) => map_transaction_error(&e),
    }
}

/// DELETE `/transactions/{transaction_id}` - Delete a transaction.
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = TransactionRepository::new((*state.db).clone());

    match repo.delete(household_id, transaction_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_transaction_error(&e),
    }
}

/// Maps transaction errors to HTTP responses.
fn map_transaction_error(e: &TransactionError) -> axum::response::Response {
    match e {
        TransactionError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Transaction not found: {id}")
            })),
        )
            .into_response(),
        TransactionError::BudgetNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "budget_not_found",
                "message": format!("Budget not found: {id}")
            })),
        )
            .into_response(),
        TransactionError::InvalidCategory(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_category",
                "message": format!("Invalid category reference: {id}")
            })),
        )
            .into_response(),
        TransactionError::InvalidPayload(message) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_payload",
                "message": message
            })),
        )
            .into_response(),
        TransactionError::Database(err) => {
            error!(error = %err, "Transaction operation failed");
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
