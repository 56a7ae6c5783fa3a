//! Inventory: public listings, offline intake and the vehicle-sold event.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bson::DateTime;
use uuid::Uuid;
use validator::Validate;

use service_core::error::AppError;

use crate::dtos::cars::{MarkSoldRequest, MarkSoldResponse, PublicCarResponse};
use crate::dtos::responses::{format_datetime, CarResponse, SellRequestResponse};
use crate::dtos::sell_requests::OfflineCarRequest;
use crate::middleware::AdminContext;
use crate::models::{Car, SellRequest, SellRequestStatus, Source};
use crate::startup::AppState;

use super::sell_requests::{build_rc_details, build_seller, build_vehicle};

/// GET /api/cars: public storefront listing.
pub async fn list_cars_for_buyers(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicCarResponse>>, AppError> {
    let cars = state.repository.list_cars().await?;
    Ok(Json(
        cars.into_iter()
            .map(|car| PublicCarResponse {
                id: car.id,
                car: car.car,
                admin_selling_price: car.admin_selling_price,
                status: car.status,
                created_at: format_datetime(car.created_at),
            })
            .collect(),
    ))
}

/// GET /api/cars/{id}: public car detail.
pub async fn get_car(
    State(state): State<AppState>,
    Path(car_id): Path<Uuid>,
) -> Result<Json<CarResponse>, AppError> {
    let car = state
        .repository
        .find_car(car_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Car not found")))?;
    Ok(Json(CarResponse::from(car)))
}

/// GET /api/admin/cars: full inventory, newest first.
pub async fn list_inventory(
    State(state): State<AppState>,
) -> Result<Json<Vec<CarResponse>>, AppError> {
    let cars = state.repository.list_cars().await?;
    Ok(Json(cars.into_iter().map(Into::into).collect()))
}

/// POST /api/admin/offline-car: walk-in seller; the request is recorded as
/// already approved and the car goes live immediately.
pub async fn add_offline_car(
    State(state): State<AppState>,
    _admin: AdminContext,
    Json(payload): Json<OfflineCarRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    payload.validate()?;
    if !payload.seller_price.is_positive() {
        return Err(AppError::Validation(anyhow::anyhow!(
            "Invalid seller price"
        )));
    }

    let now = DateTime::now();
    let request = SellRequest {
        id: Uuid::new_v4(),
        source: Source::Offline,
        seller: build_seller(payload.seller),
        car: build_vehicle(payload.car),
        admin_expenses: payload.admin_expenses.into_iter().map(Into::into).collect(),
        seller_documents: payload
            .seller_documents
            .into_iter()
            .map(Into::into)
            .collect(),
        seller_price: payload.seller_price,
        admin_selling_price: Some(payload.admin_selling_price.unwrap_or(payload.seller_price)),
        rc_details: build_rc_details(payload.rc_details)?,
        status: SellRequestStatus::Approved,
        reject_reason: None,
        approved_at: Some(now),
        rejected_at: None,
        created_at: now,
        updated_at: now,
    };
    state.repository.insert_sell_request(&request).await?;

    let car = Car::from_approved_request(&request);
    state.repository.insert_car(&car).await?;

    tracing::info!(request_id = %request.id, car_id = %car.id, "offline car added, live");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Offline car added & LIVE",
            "sellRequest": SellRequestResponse::from(request),
            "liveCar": CarResponse::from(car),
        })),
    ))
}

/// PUT /api/admin/mark-sold/{carId}: the vehicle-sold event; delegates to
/// the sale ledger.
pub async fn mark_sold(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(car_id): Path<Uuid>,
    Json(payload): Json<MarkSoldRequest>,
) -> Result<Json<MarkSoldResponse>, AppError> {
    let outcome = state.ledger.record_sale(car_id, payload).await?;

    Ok(Json(MarkSoldResponse {
        message: "Car marked as SOLD successfully".to_string(),
        car: CarResponse::from(outcome.car),
        sale: outcome.sale.into(),
    }))
}
