use axum::{extract::State, Json};

use service_core::error::AppError;

use crate::dtos::auth::{AdminInfo, LoginRequest, LoginResponse};
use crate::services::password::verify_password;
use crate::startup::AppState;

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(anyhow::anyhow!(
            "Email & password required"
        )));
    }

    let admin = state
        .repository
        .find_admin_by_email(payload.email.trim())
        .await?
        .ok_or_else(|| AppError::Auth(anyhow::anyhow!("Invalid credentials")))?;

    if !verify_password(&payload.password, &admin.password_hash)? {
        return Err(AppError::Auth(anyhow::anyhow!("Invalid credentials")));
    }

    let token = state.jwt.issue_token(&admin)?;
    tracing::info!(admin_id = %admin.id, "admin logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        admin: AdminInfo {
            id: admin.id,
            email: admin.email,
            role: admin.role,
        },
    }))
}
