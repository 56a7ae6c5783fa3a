use bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;

/// Where the vehicle entered the pipeline: the public website form or an
/// admin-entered walk-in seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Source {
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SellerType {
    Individual,
    Dealer,
    Platform,
}

impl Default for SellerType {
    fn default() -> Self {
        SellerType::Individual
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    #[serde(rename = "type", default)]
    pub seller_type: SellerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_name: Option<String>,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

/// Vehicle details as captured at intake. Image locators are ordered:
/// front, rear, engine, number plate, then interiors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub brand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub year: i32,
    pub registration_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub fuel_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission: Option<String>,
    pub km_driven: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    pub images: Vec<String>,
}

/// Minimum vehicle photos at intake: front, rear, engine, number plate.
pub const MIN_VEHICLE_IMAGES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RcOwner {
    Yes,
    No,
}

/// Registration-certificate ownership. When the seller is not the RC holder
/// the holder's name and an RC image locator are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcDetails {
    pub rc_owner: RcOwner,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rc_owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rc_image: Option<String>,
}

/// One labelled cost line attributed to the dealership.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseLine {
    pub label: String,
    pub amount: Money,
}

/// One labelled set of document locators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAttachment {
    pub label: String,
    #[serde(default)]
    pub file_urls: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SellRequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// An intake record moving PENDING -> APPROVED (becomes a live car) or
/// PENDING -> REJECTED (with a reason).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellRequest {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub source: Source,
    pub seller: Seller,
    pub car: Vehicle,
    #[serde(default)]
    pub admin_expenses: Vec<ExpenseLine>,
    #[serde(default)]
    pub seller_documents: Vec<DocumentAttachment>,
    pub seller_price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_selling_price: Option<Money>,
    pub rc_details: RcDetails,
    pub status: SellRequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}
