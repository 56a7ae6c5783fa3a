//! Per-payment receipt projections.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use service_core::error::AppError;

use crate::dtos::sales::{PaymentReceiptResponse, StoredDocumentResponse};
use crate::middleware::AdminContext;
use crate::startup::AppState;

/// GET /api/admin/payments/{paymentId}
pub async fn payment_receipt(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<PaymentReceiptResponse>, AppError> {
    let view = state.ledger.payment_receipt(payment_id).await?;

    Ok(Json(PaymentReceiptResponse {
        payment: view.payment.into(),
        sale: view.sale.into(),
        car: view.car.into(),
    }))
}

/// GET /api/admin/payments/{paymentId}/receipt: render the receipt into
/// the document store and return its locator.
pub async fn payment_receipt_document(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<StoredDocumentResponse>, AppError> {
    let view = state.ledger.payment_receipt(payment_id).await?;
    let stored = state.invoices.store_receipt(&view).await?;

    Ok(Json(StoredDocumentResponse {
        message: "Receipt generated and uploaded successfully".to_string(),
        url: stored.url,
        file_name: stored.file_name,
    }))
}
