//! Sale ledger endpoints: list, detail, payment intake, final invoice.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::collections::HashMap;
use uuid::Uuid;

use service_core::error::AppError;

use crate::dtos::responses::format_datetime;
use crate::dtos::sales::{
    AddPaymentRequest, AddPaymentResponse, FinalInvoiceResponse, SaleDetailsResponse,
    SaleListBuyer, SaleListCar, SaleListItem, StoredDocumentResponse,
};
use crate::middleware::AdminContext;
use crate::models::Car;
use crate::startup::AppState;

/// GET /api/admin/sales: every sale with buyer/vehicle context.
pub async fn list_sales(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<Vec<SaleListItem>>, AppError> {
    let sales = state.repository.list_sales().await?;
    let cars: HashMap<Uuid, Car> = state
        .repository
        .list_cars()
        .await?
        .into_iter()
        .map(|car| (car.id, car))
        .collect();

    let items = sales
        .into_iter()
        .map(|sale| {
            let car = cars.get(&sale.car_id);
            let payment_mode = car
                .and_then(|car| car.payment.as_ref())
                .map(|info| {
                    info.cash_payment_mode
                        .map(|mode| mode.as_str().to_string())
                        .unwrap_or_else(|| info.payment_type.as_str().to_string())
                })
                .unwrap_or_else(|| "—".to_string());

            SaleListItem {
                sale_id: sale.id,
                car: SaleListCar {
                    brand: Some(sale.car.brand.clone()),
                    variant: sale.car.variant.clone(),
                },
                buyer: SaleListBuyer {
                    name: sale.buyer.name.clone(),
                    phone: sale.buyer.phone.clone(),
                },
                total_amount: sale.payment_summary.total_amount,
                paid_amount: sale.payment_summary.paid_amount,
                remaining_amount: sale.payment_summary.remaining_amount,
                status: sale.payment_summary.status,
                payment_mode,
                sold_at: format_datetime(sale.sale_date),
            }
        })
        .collect();

    Ok(Json(items))
}

/// POST /api/admin/sales/{saleId}/payments
pub async fn add_payment(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(sale_id): Path<Uuid>,
    Json(payload): Json<AddPaymentRequest>,
) -> Result<(StatusCode, Json<AddPaymentResponse>), AppError> {
    let (payment, summary) = state.ledger.add_payment(sale_id, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(AddPaymentResponse {
            message: "Payment added successfully".to_string(),
            payment: payment.into(),
            sale_summary: (&summary).into(),
        }),
    ))
}

/// GET /api/admin/sales/{saleId}: the full ledger projection.
pub async fn sale_details(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(sale_id): Path<Uuid>,
) -> Result<Json<SaleDetailsResponse>, AppError> {
    let view = state.ledger.ledger(sale_id).await?;

    Ok(Json(SaleDetailsResponse {
        sale: view.sale.into(),
        car: view.car.into(),
        payments: view.payments.into_iter().map(Into::into).collect(),
        loan: view.loan.map(Into::into),
    }))
}

/// GET /api/admin/sales/{saleId}/final-invoice: only once fully paid.
pub async fn final_invoice(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(sale_id): Path<Uuid>,
) -> Result<Json<FinalInvoiceResponse>, AppError> {
    let view = state.ledger.final_invoice(sale_id).await?;

    Ok(Json(FinalInvoiceResponse {
        final_invoice_number: view.final_invoice_number.clone(),
        generated_at: format_datetime(view.generated_at),
        sale: view.sale.into(),
        car: view.car.into(),
        payments: view.payments.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/admin/sales/{saleId}/final-invoice/document: render the
/// consolidated invoice into the document store and return its locator.
pub async fn final_invoice_document(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(sale_id): Path<Uuid>,
) -> Result<Json<StoredDocumentResponse>, AppError> {
    let view = state.ledger.final_invoice(sale_id).await?;
    let stored = state.invoices.store_final_invoice(&view).await?;

    Ok(Json(StoredDocumentResponse {
        message: "Final invoice generated & uploaded successfully".to_string(),
        url: stored.url,
        file_name: stored.file_name,
    }))
}
