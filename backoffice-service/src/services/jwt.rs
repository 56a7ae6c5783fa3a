use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use service_core::error::AppError;

use crate::models::Admin;

/// Claims carried by an admin access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin id.
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
}

/// HS256 token issue/verify against the configured secret.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl JwtService {
    pub fn new(secret: &Secret<String>, token_expiry_hours: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            token_expiry_hours,
        }
    }

    pub fn issue_token(&self, admin: &Admin) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = AdminClaims {
            sub: admin.id.to_string(),
            email: admin.email.clone(),
            role: admin.role.clone(),
            exp: (now + Duration::hours(self.token_expiry_hours)).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {e}")))
    }

    pub fn validate_token(&self, token: &str) -> Result<AdminClaims, AppError> {
        decode::<AdminClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| AppError::Auth(anyhow::anyhow!("Invalid token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::DateTime;
    use uuid::Uuid;

    fn test_admin() -> Admin {
        Admin {
            id: Uuid::new_v4(),
            email: "admin@dealership.test".to_string(),
            password_hash: "irrelevant".to_string(),
            role: "admin".to_string(),
            created_at: DateTime::now(),
        }
    }

    #[test]
    fn issue_and_validate_round_trip() {
        let service = JwtService::new(&Secret::new("test-secret".to_string()), 1);
        let admin = test_admin();
        let token = service.issue_token(&admin).unwrap();
        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, admin.id.to_string());
        assert_eq!(claims.email, admin.email);
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn token_signed_with_other_secret_rejected() {
        let issuer = JwtService::new(&Secret::new("secret-a".to_string()), 1);
        let verifier = JwtService::new(&Secret::new("secret-b".to_string()), 1);
        let token = issuer.issue_token(&test_admin()).unwrap();
        assert!(matches!(
            verifier.validate_token(&token),
            Err(AppError::Auth(_))
        ));
    }
}
