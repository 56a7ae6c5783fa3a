use bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for one stored file. The document store keeps the bytes; every
/// other record references the locator URL only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
    pub created_at: DateTime,
}
