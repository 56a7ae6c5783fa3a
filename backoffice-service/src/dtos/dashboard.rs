use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Buyer, ExpenseLine, Money, RcDetails, Seller, Source, Vehicle};

use super::responses::{PaymentResponse, PaymentSummaryResponse};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsResponse {
    pub pending_requests: u64,
    pub approved_requests: u64,
    pub rejected_requests: u64,
    pub live_cars: u64,
    pub sold_cars: u64,
    /// Sum of paid amounts across all sales.
    pub total_revenue: Money,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryParams {
    pub source: Option<String>,
    /// ISO dates (YYYY-MM-DD) bounding `soldAt`.
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

/// One sold vehicle with its full money trail and profit figures.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: Uuid,
    pub car: Vehicle,
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sold_at: Option<String>,
    pub rc_details: RcDetails,
    pub seller: Seller,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<Buyer>,
    pub seller_price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_selling_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_price: Option<Money>,
    pub sale_id: Uuid,
    pub payment_summary: PaymentSummaryResponse,
    pub payments: Vec<PaymentResponse>,
    pub admin_expenses: Vec<ExpenseLine>,
    pub total_admin_expense: Money,
    pub profit_before_expense: Money,
    pub net_profit: Money,
}
