use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Dropdown master for admin expense labels; new labels are upserted when an
/// approval introduces them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseLabel {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub label: String,
    pub is_active: bool,
}

/// Dropdown master for seller document labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLabel {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub label: String,
    pub is_active: bool,
}
