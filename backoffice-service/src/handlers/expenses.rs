//! Dealership running expenses and the dropdown label masters.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bson::DateTime;
use uuid::Uuid;

use service_core::error::AppError;

use crate::dtos::expenses::{AddExpenseRequest, AddExpenseResponse, ExpenseListParams};
use crate::dtos::responses::ExpenseResponse;
use crate::middleware::AdminContext;
use crate::models::Expense;
use crate::startup::AppState;

/// POST /api/admin/expenses
pub async fn add(
    State(state): State<AppState>,
    _admin: AdminContext,
    Json(payload): Json<AddExpenseRequest>,
) -> Result<(StatusCode, Json<AddExpenseResponse>), AppError> {
    let person = payload.person.filter(|p| !p.trim().is_empty());
    let title = payload.title.filter(|t| !t.trim().is_empty());
    let (person, title, amount) = match (person, title, payload.amount) {
        (Some(person), Some(title), Some(amount)) => (person, title, amount),
        _ => {
            return Err(AppError::Validation(anyhow::anyhow!(
                "person, title and amount are required"
            )))
        }
    };
    if !amount.is_positive() {
        return Err(AppError::Validation(anyhow::anyhow!(
            "Expense amount must be greater than 0"
        )));
    }

    let date = match &payload.date {
        Some(raw) => chrono::DateTime::parse_from_rfc3339(raw)
            .map(|dt| DateTime::from_chrono(dt.with_timezone(&chrono::Utc)))
            .map_err(|_| AppError::Validation(anyhow::anyhow!("Invalid expense date")))?,
        None => DateTime::now(),
    };

    let expense = Expense {
        id: Uuid::new_v4(),
        person,
        title,
        amount,
        category: payload.category.unwrap_or_else(|| "General".to_string()),
        date,
        created_at: DateTime::now(),
    };
    state.repository.insert_expense(&expense).await?;

    Ok((
        StatusCode::CREATED,
        Json(AddExpenseResponse {
            message: "Expense added successfully".to_string(),
            expense: expense.into(),
        }),
    ))
}

/// GET /api/admin/expenses?person=...
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminContext,
    Query(params): Query<ExpenseListParams>,
) -> Result<Json<Vec<ExpenseResponse>>, AppError> {
    let expenses = state
        .repository
        .list_expenses(params.person.as_deref())
        .await?;
    Ok(Json(expenses.into_iter().map(Into::into).collect()))
}

/// DELETE /api/admin/expenses/{id}
pub async fn remove(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.repository.delete_expense(id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Expense not found")));
    }
    Ok(Json(serde_json::json!({
        "message": "Expense deleted successfully"
    })))
}

/// GET /api/admin/expense-options: dropdown labels.
pub async fn expense_options(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.repository.list_expense_labels().await?))
}

/// GET /api/admin/document-options: dropdown labels.
pub async fn document_options(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.repository.list_document_labels().await?))
}
