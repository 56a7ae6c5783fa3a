use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Money, PaymentMode, PaymentType, Vehicle};

use super::responses::{CarResponse, SaleResponse};
use super::sell_requests::ExpenseLineInput;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerDetailsInput {
    pub buyer_name: Option<String>,
    pub buyer_phone: Option<String>,
    pub buyer_email: Option<String>,
    pub buyer_city: Option<String>,
    pub sold_price: Option<Money>,
    /// RFC 3339; defaults to now.
    pub sale_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalePaymentInput {
    #[serde(rename = "type")]
    pub payment_type: Option<PaymentType>,
    #[serde(default)]
    pub cash_paid: Money,
    pub cash_payment_mode: Option<PaymentMode>,
    #[serde(default)]
    pub loan_total: Money,
    #[serde(default)]
    pub loan_paid_now: Money,
    pub finance_company: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerKycInput {
    #[serde(default)]
    pub aadhaar: Vec<String>,
    #[serde(default)]
    pub pan: Vec<String>,
    #[serde(default)]
    pub photo: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtoFormsInput {
    #[serde(default)]
    pub form29: Vec<String>,
    #[serde(default)]
    pub form30: Vec<String>,
    #[serde(default)]
    pub form28: Vec<String>,
    #[serde(default)]
    pub form35: Vec<String>,
}

/// Body of `PUT /api/admin/mark-sold/{carId}`. Document fields carry
/// locators previously returned by the upload endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkSoldRequest {
    pub buyer_details: BuyerDetailsInput,
    pub payment: SalePaymentInput,
    pub buyer_kyc: BuyerKycInput,
    pub buyer_rto: RtoFormsInput,
    #[serde(default)]
    pub extra_admin_expenses: Vec<ExpenseLineInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkSoldResponse {
    pub message: String,
    pub car: CarResponse,
    pub sale: SaleResponse,
}

/// Public storefront projection of a car.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCarResponse {
    pub id: Uuid,
    pub car: Vehicle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_selling_price: Option<Money>,
    pub status: crate::models::CarStatus,
    pub created_at: String,
}
