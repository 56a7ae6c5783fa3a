use bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Applied,
    Approved,
    Disbursed,
}

/// Financing record tied to a sale. Disbursements land in the ledger as
/// LOAN-type payments; this tracks the financing side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub sale_id: Uuid,
    pub car_id: Uuid,
    pub loan_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finance_company: Option<String>,
    pub status: LoanStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}
