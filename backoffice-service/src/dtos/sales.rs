use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Money, PaymentMode, PaymentType, SaleStatus};

use super::responses::{CarResponse, LoanResponse, PaymentResponse, PaymentSummaryResponse, SaleResponse};

/// Body of `POST /api/admin/sales/{saleId}/payments`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentRequest {
    pub amount: Money,
    pub payment_type: Option<PaymentType>,
    pub payment_mode: Option<PaymentMode>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentResponse {
    pub message: String,
    pub payment: PaymentResponse,
    pub sale_summary: PaymentSummaryResponse,
}

/// Row of `GET /api/admin/sales`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleListItem {
    pub sale_id: Uuid,
    pub car: SaleListCar,
    pub buyer: SaleListBuyer,
    pub total_amount: Money,
    pub paid_amount: Money,
    pub remaining_amount: Money,
    pub status: SaleStatus,
    pub payment_mode: String,
    pub sold_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleListCar {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleListBuyer {
    pub name: String,
    pub phone: String,
}

/// `GET /api/admin/sales/{saleId}`: the full ledger projection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetailsResponse {
    pub sale: SaleResponse,
    pub car: CarResponse,
    pub payments: Vec<PaymentResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan: Option<LoanResponse>,
}

/// `GET /api/admin/sales/{saleId}/final-invoice`, producible only once the
/// sale is fully paid.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalInvoiceResponse {
    pub final_invoice_number: String,
    pub sale: SaleResponse,
    pub car: CarResponse,
    pub payments: Vec<PaymentResponse>,
    pub generated_at: String,
}

/// `GET /api/admin/payments/{paymentId}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceiptResponse {
    pub payment: PaymentResponse,
    pub sale: SaleResponse,
    pub car: CarResponse,
}

/// Result of rendering a receipt/invoice into the document store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocumentResponse {
    pub message: String,
    pub url: String,
    pub file_name: String,
}
