use serde::{Deserialize, Serialize};

use crate::models::Money;

use super::responses::ExpenseResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddExpenseRequest {
    pub person: Option<String>,
    pub title: Option<String>,
    pub amount: Option<Money>,
    pub category: Option<String>,
    /// RFC 3339; defaults to now.
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddExpenseResponse {
    pub message: String,
    pub expense: ExpenseResponse,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseListParams {
    pub person: Option<String>,
}
