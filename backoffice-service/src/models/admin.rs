use bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A back-office operator account. Passwords are stored as argon2 hashes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime,
}
