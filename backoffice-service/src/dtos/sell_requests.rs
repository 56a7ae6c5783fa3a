use serde::Deserialize;
use validator::Validate;

use crate::models::{
    DocumentAttachment, ExpenseLine, Money, RcOwner, SellerType,
};

use super::responses::SellRequestResponse;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SellerInput {
    #[serde(rename = "type", default)]
    pub seller_type: SellerType,
    pub platform_name: Option<String>,
    #[validate(length(min = 1, message = "seller name is required"))]
    pub name: String,
    #[validate(length(min = 7, message = "seller phone is required"))]
    pub phone: String,
    pub alt_phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "seller city is required"))]
    pub city: String,
    pub area: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInput {
    #[validate(length(min = 1, message = "brand is required"))]
    pub brand: String,
    pub model: Option<String>,
    #[validate(range(min = 1980, max = 2035, message = "year out of range"))]
    pub year: i32,
    #[validate(length(min = 4, message = "registration number is required"))]
    pub registration_number: String,
    pub variant: Option<String>,
    #[validate(length(min = 1, message = "fuel type is required"))]
    pub fuel_type: String,
    pub transmission: Option<String>,
    #[validate(range(min = 0, message = "km driven cannot be negative"))]
    pub km_driven: i64,
    pub condition: Option<String>,
    #[validate(length(min = 4, message = "minimum 4 images required (front, rear, engine, number plate)"))]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcDetailsInput {
    pub rc_owner: RcOwner,
    pub rc_owner_name: Option<String>,
    pub rc_image: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSellRequest {
    #[validate(nested)]
    pub seller: SellerInput,
    #[validate(nested)]
    pub car: VehicleInput,
    pub expected_price: Money,
    pub rc_details: RcDetailsInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseLineInput {
    pub label: String,
    pub amount: Money,
}

impl From<ExpenseLineInput> for ExpenseLine {
    fn from(input: ExpenseLineInput) -> Self {
        ExpenseLine {
            label: input.label,
            amount: input.amount,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAttachmentInput {
    pub label: String,
    #[serde(default)]
    pub file_urls: Vec<String>,
}

impl From<DocumentAttachmentInput> for DocumentAttachment {
    fn from(input: DocumentAttachmentInput) -> Self {
        DocumentAttachment {
            label: input.label,
            file_urls: input.file_urls,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveSellRequest {
    pub admin_selling_price: Money,
    #[serde(default)]
    pub admin_expenses: Vec<ExpenseLineInput>,
    #[serde(default)]
    pub seller_documents: Vec<DocumentAttachmentInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectSellRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSellRequest {
    pub expected_price: Option<Money>,
    pub admin_selling_price: Option<Money>,
    /// Appended to the existing vehicle images.
    #[serde(default)]
    pub images: Vec<String>,
}

/// Offline walk-in intake: the admin captures everything the public form
/// would, plus pricing, and the car goes live immediately.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OfflineCarRequest {
    #[validate(nested)]
    pub seller: SellerInput,
    #[validate(nested)]
    pub car: VehicleInput,
    pub rc_details: RcDetailsInput,
    pub seller_price: Money,
    pub admin_selling_price: Option<Money>,
    #[serde(default)]
    pub admin_expenses: Vec<ExpenseLineInput>,
    #[serde(default)]
    pub seller_documents: Vec<DocumentAttachmentInput>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellRequestDetail {
    pub car_details: crate::models::Vehicle,
    pub images: Vec<String>,
    pub contact: crate::models::Seller,
    pub expected_price: Money,
    pub rc_details: crate::models::RcDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_selling_price: Option<Money>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSellRequestResponse {
    pub message: String,
    pub data: SellRequestResponse,
}
