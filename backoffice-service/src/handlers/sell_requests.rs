//! Sell-request intake and the admin approval workflow.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bson::DateTime;
use uuid::Uuid;
use validator::Validate;

use service_core::error::AppError;

use crate::dtos::responses::{CarResponse, SellRequestResponse};
use crate::dtos::sell_requests::{
    ApproveSellRequest, CreateSellRequest, CreateSellRequestResponse, RejectSellRequest,
    SellRequestDetail, UpdateSellRequest,
};
use crate::middleware::AdminContext;
use crate::models::{
    Car, RcDetails, RcOwner, Seller, SellRequest, SellRequestStatus, Source, Vehicle,
};
use crate::startup::AppState;

pub(crate) fn build_vehicle(input: crate::dtos::sell_requests::VehicleInput) -> Vehicle {
    Vehicle {
        brand: input.brand,
        model: input.model,
        year: input.year,
        registration_number: input.registration_number.to_uppercase(),
        variant: input.variant,
        fuel_type: input.fuel_type,
        transmission: input.transmission,
        km_driven: input.km_driven,
        condition: input.condition,
        images: input.images,
    }
}

pub(crate) fn build_seller(input: crate::dtos::sell_requests::SellerInput) -> Seller {
    Seller {
        seller_type: input.seller_type,
        platform_name: input.platform_name,
        name: input.name,
        phone: input.phone,
        alt_phone: input.alt_phone,
        email: input.email,
        city: input.city,
        area: input.area,
    }
}

pub(crate) fn build_rc_details(input: crate::dtos::sell_requests::RcDetailsInput) -> Result<RcDetails, AppError> {
    if input.rc_owner == RcOwner::No {
        if input.rc_owner_name.as_deref().map_or(true, str::is_empty) {
            return Err(AppError::Validation(anyhow::anyhow!(
                "RC owner name is required when the seller is not the RC holder"
            )));
        }
        if input.rc_image.as_deref().map_or(true, str::is_empty) {
            return Err(AppError::Validation(anyhow::anyhow!(
                "RC image is required when the seller is not the RC holder"
            )));
        }
    }
    Ok(RcDetails {
        rc_owner: input.rc_owner,
        rc_owner_name: if input.rc_owner == RcOwner::No {
            input.rc_owner_name
        } else {
            None
        },
        rc_image: if input.rc_owner == RcOwner::No {
            input.rc_image
        } else {
            None
        },
    })
}

/// POST /api/sell: public intake from the website form.
pub async fn create_sell_request(
    State(state): State<AppState>,
    Json(payload): Json<CreateSellRequest>,
) -> Result<(StatusCode, Json<CreateSellRequestResponse>), AppError> {
    payload.validate()?;
    if !payload.expected_price.is_positive() {
        return Err(AppError::Validation(anyhow::anyhow!(
            "Invalid seller price"
        )));
    }

    let now = DateTime::now();
    let request = SellRequest {
        id: Uuid::new_v4(),
        source: Source::Online,
        seller: build_seller(payload.seller),
        car: build_vehicle(payload.car),
        admin_expenses: Vec::new(),
        seller_documents: Vec::new(),
        seller_price: payload.expected_price,
        admin_selling_price: None,
        rc_details: build_rc_details(payload.rc_details)?,
        status: SellRequestStatus::Pending,
        reject_reason: None,
        approved_at: None,
        rejected_at: None,
        created_at: now,
        updated_at: now,
    };

    state.repository.insert_sell_request(&request).await?;
    tracing::info!(request_id = %request.id, "sell request created");

    Ok((
        StatusCode::CREATED,
        Json(CreateSellRequestResponse {
            message: "Car sell request created successfully".to_string(),
            data: SellRequestResponse::from(request),
        }),
    ))
}

/// GET /api/admin/sell-requests: pending intake queue.
pub async fn pending(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<Vec<SellRequestResponse>>, AppError> {
    let requests = state
        .repository
        .list_sell_requests(SellRequestStatus::Pending)
        .await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// GET /api/admin/approved
pub async fn approved(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<Vec<SellRequestResponse>>, AppError> {
    let requests = state
        .repository
        .list_sell_requests(SellRequestStatus::Approved)
        .await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// GET /api/admin/rejected
pub async fn rejected(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<Vec<SellRequestResponse>>, AppError> {
    let requests = state
        .repository
        .list_sell_requests(SellRequestStatus::Rejected)
        .await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// GET /api/admin/sell-requests/{id}: form-shaped detail.
pub async fn get_by_id(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(id): Path<Uuid>,
) -> Result<Json<SellRequestDetail>, AppError> {
    let request = state
        .repository
        .find_sell_request(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Sell request not found")))?;

    Ok(Json(SellRequestDetail {
        images: request.car.images.clone(),
        car_details: request.car,
        contact: request.seller,
        expected_price: request.seller_price,
        rc_details: request.rc_details,
        admin_selling_price: request.admin_selling_price,
    }))
}

/// PUT /api/admin/sell-requests/{id}: price/image touch-ups.
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSellRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut request = state
        .repository
        .find_sell_request(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Sell request not found")))?;

    if let Some(expected_price) = payload.expected_price {
        if !expected_price.is_positive() {
            return Err(AppError::Validation(anyhow::anyhow!(
                "Invalid seller price"
            )));
        }
        request.seller_price = expected_price;
    }
    if let Some(admin_selling_price) = payload.admin_selling_price {
        request.admin_selling_price = Some(admin_selling_price);
    }
    if !payload.images.is_empty() {
        request.car.images.extend(payload.images);
    }
    request.updated_at = DateTime::now();

    state.repository.replace_sell_request(&request).await?;

    Ok(Json(serde_json::json!({
        "message": "Sell request updated successfully",
        "request": SellRequestResponse::from(request),
    })))
}

/// PUT /api/admin/approve/{id}: approve the request and put the car live.
/// New expense/document labels are folded into the dropdown masters.
pub async fn approve(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveSellRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !payload.admin_selling_price.is_positive() {
        return Err(AppError::Validation(anyhow::anyhow!(
            "Invalid admin selling price"
        )));
    }

    let mut request = state
        .repository
        .find_sell_request(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Sell request not found")))?;
    if request.status != SellRequestStatus::Pending {
        return Err(AppError::Precondition(anyhow::anyhow!(
            "Sell request has already been processed"
        )));
    }

    for line in &payload.admin_expenses {
        let label = line.label.trim();
        if !label.is_empty() {
            state.repository.upsert_expense_label(label).await?;
        }
    }
    for document in &payload.seller_documents {
        let label = document.label.trim();
        if !label.is_empty() {
            state.repository.upsert_document_label(label).await?;
        }
    }

    request.admin_selling_price = Some(payload.admin_selling_price);
    request.admin_expenses = payload.admin_expenses.into_iter().map(Into::into).collect();
    request.seller_documents = payload
        .seller_documents
        .into_iter()
        .map(Into::into)
        .collect();
    request.status = SellRequestStatus::Approved;
    request.approved_at = Some(DateTime::now());
    request.updated_at = DateTime::now();
    state.repository.replace_sell_request(&request).await?;

    let car = Car::from_approved_request(&request);
    state.repository.insert_car(&car).await?;

    tracing::info!(request_id = %request.id, car_id = %car.id, "sell request approved, car live");

    Ok(Json(serde_json::json!({
        "message": "Car approved & LIVE",
        "car": CarResponse::from(car),
        "seller": request.seller,
        "sellRequestId": request.id,
    })))
}

/// PUT /api/admin/reject/{id}
pub async fn reject(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectSellRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let reason = payload
        .reason
        .filter(|reason| !reason.trim().is_empty())
        .ok_or_else(|| AppError::Validation(anyhow::anyhow!("Reject reason is required")))?;

    let mut request = state
        .repository
        .find_sell_request(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Sell request not found")))?;

    request.status = SellRequestStatus::Rejected;
    request.reject_reason = Some(reason);
    request.rejected_at = Some(DateTime::now());
    request.updated_at = DateTime::now();
    state.repository.replace_sell_request(&request).await?;

    Ok(Json(serde_json::json!({
        "message": "Sell request rejected successfully"
    })))
}
