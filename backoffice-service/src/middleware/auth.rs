//! Admin authentication extractor.
//!
//! Handlers that take an [`AdminContext`] argument only run with a valid
//! Bearer token issued by `POST /api/admin/login`.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use service_core::error::AppError;

use crate::startup::AppState;

/// The authenticated operator behind an admin request.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub admin_id: Uuid,
    pub email: String,
    pub role: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Auth(anyhow::anyhow!("Missing Authorization header")))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Auth(anyhow::anyhow!("Expected Bearer token")))?;

        let claims = state.jwt.validate_token(token)?;
        let admin_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Auth(anyhow::anyhow!("Invalid token subject")))?;

        let span = tracing::Span::current();
        span.record("admin_id", claims.sub.as_str());

        Ok(AdminContext {
            admin_id,
            email: claims.email,
            role: claims.role,
        })
    }
}
