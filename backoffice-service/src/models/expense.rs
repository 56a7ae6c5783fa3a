use bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;

/// A dealership running expense, attributed to a partner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub person: String,
    pub title: String,
    pub amount: Money,
    pub category: String,
    pub date: DateTime,
    pub created_at: DateTime,
}
