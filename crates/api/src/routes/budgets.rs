//! Budget routes: atomic creation, listings, detail with computed summary,
//! and lifecycle updates.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::resolve_household};
use hearth_core::budget::{BudgetSort, BudgetStatusFilter, IncomeInput, PlannedExpenseInput};
use hearth_db::{
    BudgetError, BudgetRepository, CreateBudgetInput, DetailOptions, ListOptions,
};
use hearth_shared::types::PageRequest;

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route(
            "/budgets/{budget_id}",
            get(get_budget).patch(update_budget).delete(delete_budget),
        )
        .route("/budgets/{budget_id}/incomes", put(replace_incomes))
        .route(
            "/budgets/{budget_id}/incomes/{income_id}",
            patch(update_income),
        )
        .route(
            "/budgets/{budget_id}/planned-expenses",
            put(replace_planned_expenses),
        )
        .route(
            "/budgets/{budget_id}/planned-expenses/{planned_expense_id}",
            patch(update_planned_expense),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating a budget.
#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    /// Target month; `YYYY-MM`, a first-of-month date, or a timestamp.
    pub month: String,
    /// Optional note.
    pub note: Option<String>,
    /// Income lines.
    #[serde(default)]
    pub incomes: Vec<IncomeInput>,
    /// Planned spending limits.
    #[serde(default)]
    pub planned_expenses: Vec<PlannedExpenseInput>,
}

/// Query parameters for listing budgets.
#[derive(Debug, Deserialize)]
pub struct ListBudgetsQuery {
    /// Exact-month filter.
    pub month: Option<String>,
    /// Month-relative filter: current, past, upcoming, all.
    pub status: Option<String>,
    /// Attach computed totals to each budget.
    #[serde(default)]
    pub include_summary: bool,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
    /// Sort order: month_asc or month_desc.
    pub sort: Option<String>,
}

/// Query parameters for the single-budget detail fetch.
#[derive(Debug, Deserialize)]
pub struct BudgetDetailQuery {
    /// Embed the raw transaction rows.
    #[serde(default)]
    pub include_transactions: bool,
    /// Show income lines from deactivated members.
    #[serde(default)]
    pub include_inactive_members: bool,
}

/// Request body for updating a budget. Only the note is mutable.
#[derive(Debug, Deserialize)]
pub struct UpdateBudgetRequest {
    /// New note; null or missing clears it.
    pub note: Option<String>,
}

/// Request body for replacing a budget's income set.
#[derive(Debug, Deserialize)]
pub struct ReplaceIncomesRequest {
    /// The full new income set.
    pub incomes: Vec<IncomeInput>,
}

/// Request body for replacing a budget's planned-expense set.
#[derive(Debug, Deserialize)]
pub struct ReplacePlannedExpensesRequest {
    /// The full new planned-expense set.
    pub planned_expenses: Vec<PlannedExpenseInput>,
}

/// Request body for updating one income line.
#[derive(Debug, Deserialize)]
pub struct UpdateIncomeRequest {
    /// New contribution amount.
    pub amount: Decimal,
}

/// Request body for updating one planned expense.
#[derive(Debug, Deserialize)]
pub struct UpdatePlannedExpenseRequest {
    /// New spending limit.
    pub limit_amount: Decimal,
}

fn parse_status_filter(value: Option<&str>) -> Result<BudgetStatusFilter, axum::response::Response> {
    match value {
        None | Some("all") => Ok(BudgetStatusFilter::All),
        Some("current") => Ok(BudgetStatusFilter::Current),
        Some("past") => Ok(BudgetStatusFilter::Past),
        Some("upcoming") => Ok(BudgetStatusFilter::Upcoming),
        Some(other) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_status",
                "message": format!(
                    "Unknown status filter '{other}'. Must be one of: current, past, upcoming, all"
                )
            })),
        )
            .into_response()),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/budgets` - Create a budget with its incomes and planned expenses.
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateBudgetRequest>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = BudgetRepository::new((*state.db).clone());

    let input = CreateBudgetInput {
        month: payload.month,
        note: payload.note,
        incomes: payload.incomes,
        planned_expenses: payload.planned_expenses,
    };

    match repo.create_budget(household_id, input).await {
        Ok(created) => {
            info!(
                household_id = %household_id,
                budget_id = %created.id,
                month = %created.month,
                "Budget created"
            );

            (StatusCode::CREATED, Json(json!(created))).into_response()
        }
        Err(e) => map_budget_error(&e),
    }
}

/// GET `/budgets` - List budgets with filters, pagination, and optional
/// totals.
async fn list_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListBudgetsQuery>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let status = match parse_status_filter(query.status.as_deref()) {
        Ok(status) => status,
        Err(response) => return response,
    };

    let mut page = PageRequest::default();
    if let Some(p) = query.page {
        page.page = p;
    }
    if let Some(pp) = query.per_page {
        page.per_page = pp;
    }

    let opts = ListOptions {
        month: query.month,
        status,
        include_summary: query.include_summary,
        page,
        sort: BudgetSort::parse(query.sort.as_deref()),
    };

    let repo = BudgetRepository::new((*state.db).clone());

    match repo.list_budgets(household_id, opts).await {
        Ok(page) => (StatusCode::OK, Json(json!(page))).into_response(),
        Err(e) => map_budget_error(&e),
    }
}

/// GET `/budgets/{budget_id}` - Get one budget with its computed summary.
async fn get_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
    Query(query): Query<BudgetDetailQuery>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = BudgetRepository::new((*state.db).clone());

    let opts = DetailOptions {
        include_transactions: query.include_transactions,
        include_inactive_members: query.include_inactive_members,
    };

    match repo.get_budget_detail(household_id, budget_id, opts).await {
        Ok(detail) => (StatusCode::OK, Json(json!(detail))).into_response(),
        Err(e) => map_budget_error(&e),
    }
}

/// PATCH `/budgets/{budget_id}` - Update a budget's note.
async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
    Json(payload): Json<UpdateBudgetRequest>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = BudgetRepository::new((*state.db).clone());

    match repo
        .update_note(household_id, budget_id, payload.note.as_deref())
        .await
    {
        Ok(detail) => {
            info!(household_id = %household_id, budget_id = %budget_id, "Budget note updated");
            (StatusCode::OK, Json(json!(detail))).into_response()
        }
        Err(e) => map_budget_error(&e),
    }
}

/// DELETE `/budgets/{budget_id}` - Delete a budget and everything under it.
async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = BudgetRepository::new((*state.db).clone());

    match repo.delete_budget(household_id, budget_id).await {
        Ok(()) => {
            info!(household_id = %household_id, budget_id = %budget_id, "Budget deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => map_budget_error(&e),
    }
}

/// PUT `/budgets/{budget_id}/incomes` - Replace the full income set.
async fn replace_incomes(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
    Json(payload): Json<ReplaceIncomesRequest>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = BudgetRepository::new((*state.db).clone());

    match repo
        .replace_incomes(household_id, budget_id, payload.incomes)
        .await
    {
        Ok(detail) => {
            info!(household_id = %household_id, budget_id = %budget_id, "Incomes replaced");
            (StatusCode::OK, Json(json!(detail))).into_response()
        }
        Err(e) => map_budget_error(&e),
    }
}

/// PUT `/budgets/{budget_id}/planned-expenses` - Replace the full
/// planned-expense set.
async fn replace_planned_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
    Json(payload): Json<ReplacePlannedExpensesRequest>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = BudgetRepository::new((*state.db).clone());

    match repo
        .replace_planned_expenses(household_id, budget_id, payload.planned_expenses)
        .await
    {
        Ok(detail) => {
            info!(
                household_id = %household_id,
                budget_id = %budget_id,
                "Planned expenses replaced"
            );
            (StatusCode::OK, Json(json!(detail))).into_response()
        }
        Err(e) => map_budget_error(&e),
    }
}

/// PATCH `/budgets/{budget_id}/incomes/{income_id}` - Update one income
/// line's amount.
async fn update_income(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((budget_id, income_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateIncomeRequest>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = BudgetRepository::new((*state.db).clone());

    match repo
        .update_income(household_id, budget_id, income_id, payload.amount)
        .await
    {
        Ok(income) => (StatusCode::OK, Json(json!(income))).into_response(),
        Err(e) => map_budget_error(&e),
    }
}

/// PATCH `/budgets/{budget_id}/planned-expenses/{planned_expense_id}` -
/// Update one planned expense's limit.
async fn update_planned_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((budget_id, planned_expense_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdatePlannedExpenseRequest>,
) -> impl IntoResponse {
    let household_id = match resolve_household(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = BudgetRepository::new((*state.db).clone());

    match repo
        .update_planned_expense(household_id, budget_id, planned_expense_id, payload.limit_amount)
        .await
    {
        Ok(planned) => (StatusCode::OK, Json(json!(planned))).into_response(),
        Err(e) => map_budget_error(&e),
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps budget errors to HTTP responses.
fn map_budget_error(e: &BudgetError) -> axum::response::Response {
    match e {
        BudgetError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Budget not found: {id}")
            })),
        )
            .into_response(),
        BudgetError::AlreadyExists(month) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "budget_exists",
                "message": format!("Budget already exists for month {month}")
            })),
        )
            .into_response(),
        BudgetError::InvalidMember(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_member",
                "message": format!("Invalid household member reference: {id}")
            })),
        )
            .into_response(),
        BudgetError::InvalidCategory(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_category",
                "message": format!("Invalid category reference: {id}")
            })),
        )
            .into_response(),
        BudgetError::InvalidPayload(message) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_payload",
                "message": message
            })),
        )
            .into_response(),
        BudgetError::IncomeNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "income_not_found",
                "message": format!("Income not found: {id}")
            })),
        )
            .into_response(),
        BudgetError::PlannedExpenseNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "planned_expense_not_found",
                "message": format!("Planned expense not found: {id}")
            })),
        )
            .into_response(),
        BudgetError::CreateFailed
        | BudgetError::FetchFailed
        | BudgetError::ListFailed
        | BudgetError::UpdateFailed => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
        BudgetError::Database(err) => {
            error!(error = %err, "Budget operation failed");
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
