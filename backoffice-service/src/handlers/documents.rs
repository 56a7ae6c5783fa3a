//! Seller/buyer document registries.

use axum::{
    extract::{Path, State},
    Json,
};
use bson::DateTime;
use uuid::Uuid;

use service_core::error::AppError;

use crate::dtos::documents::{
    BuyerDocumentsItem, DocumentCarSummary, SellerDocumentsItem, UpdateBuyerDocumentsRequest,
    UpdateSellerDocumentsRequest,
};
use crate::dtos::responses::{format_datetime, CarResponse, SellRequestResponse};
use crate::middleware::AdminContext;
use crate::models::{BuyerKyc, CarStatus, RtoForms, Vehicle};
use crate::startup::AppState;

fn car_summary(vehicle: &Vehicle) -> DocumentCarSummary {
    DocumentCarSummary {
        brand: vehicle.brand.clone(),
        model: vehicle.model.clone(),
        variant: vehicle.variant.clone(),
        year: Some(vehicle.year),
        registration_number: vehicle.registration_number.clone(),
    }
}

/// GET /api/admin/seller-documents: requests carrying document sets.
pub async fn seller_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<SellerDocumentsItem>>, AppError> {
    let requests = state.repository.list_sell_requests_with_documents().await?;
    Ok(Json(
        requests
            .into_iter()
            .map(|request| SellerDocumentsItem {
                sell_request_id: request.id,
                car: car_summary(&request.car),
                seller: request.seller,
                documents: request.seller_documents,
                created_at: format_datetime(request.created_at),
            })
            .collect(),
    ))
}

/// PUT /api/admin/seller-documents/{sellRequestId}
pub async fn update_seller_documents(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(sell_request_id): Path<Uuid>,
    Json(payload): Json<UpdateSellerDocumentsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut request = state
        .repository
        .find_sell_request(sell_request_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Sell request not found")))?;

    request.seller_documents = payload.documents.into_iter().map(Into::into).collect();
    request.updated_at = DateTime::now();
    state.repository.replace_sell_request(&request).await?;

    Ok(Json(serde_json::json!({
        "message": "Seller documents updated successfully",
        "sellRequest": SellRequestResponse::from(request),
    })))
}

/// GET /api/admin/buyer-documents: sold cars with their KYC/RTO sets.
pub async fn buyer_documents(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<Vec<BuyerDocumentsItem>>, AppError> {
    let cars = state.repository.list_cars_by_status(CarStatus::Sold).await?;
    Ok(Json(
        cars.into_iter()
            .map(|car| BuyerDocumentsItem {
                id: car.id,
                buyer: car.buyer,
                car: car_summary(&car.car),
                sold_price: car.buyer_price,
                sale_date: car.sold_at.map(format_datetime),
                buyer_kyc: car.buyer_kyc,
                buyer_rto: car.buyer_rto,
            })
            .collect(),
    ))
}

/// PUT /api/admin/buyer-documents/{carId}: partial KYC/RTO update; only
/// the supplied lists are replaced.
pub async fn update_buyer_documents(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(car_id): Path<Uuid>,
    Json(payload): Json<UpdateBuyerDocumentsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut car = state
        .repository
        .find_car(car_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Car not found")))?;

    if let Some(patch) = payload.buyer_kyc {
        let mut kyc = car.buyer_kyc.unwrap_or(BuyerKyc {
            aadhaar: Vec::new(),
            pan: Vec::new(),
            photo: Vec::new(),
        });
        if let Some(aadhaar) = patch.aadhaar {
            kyc.aadhaar = aadhaar;
        }
        if let Some(pan) = patch.pan {
            kyc.pan = pan;
        }
        if let Some(photo) = patch.photo {
            kyc.photo = photo;
        }
        car.buyer_kyc = Some(kyc);
    }

    if let Some(patch) = payload.buyer_rto {
        let mut rto = car.buyer_rto.unwrap_or(RtoForms {
            form29: Vec::new(),
            form30: Vec::new(),
            form28: Vec::new(),
            form35: Vec::new(),
        });
        if let Some(form29) = patch.form29 {
            rto.form29 = form29;
        }
        if let Some(form30) = patch.form30 {
            rto.form30 = form30;
        }
        if let Some(form28) = patch.form28 {
            rto.form28 = form28;
        }
        if let Some(form35) = patch.form35 {
            rto.form35 = form35;
        }
        car.buyer_rto = Some(rto);
    }

    car.updated_at = DateTime::now();
    state.repository.replace_car(&car).await?;

    Ok(Json(serde_json::json!({
        "message": "Buyer documents updated successfully",
        "car": CarResponse::from(car),
    })))
}
