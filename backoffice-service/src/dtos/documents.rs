use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Buyer, BuyerKyc, DocumentAttachment, Money, RtoForms, Seller};

use super::sell_requests::DocumentAttachmentInput;

/// Row of `GET /api/admin/seller-documents`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerDocumentsItem {
    pub sell_request_id: Uuid,
    pub car: DocumentCarSummary,
    pub seller: Seller,
    pub documents: Vec<DocumentAttachment>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCarSummary {
    pub brand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub registration_number: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSellerDocumentsRequest {
    pub documents: Vec<DocumentAttachmentInput>,
}

/// Row of `GET /api/admin/buyer-documents`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerDocumentsItem {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<Buyer>,
    pub car: DocumentCarSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sold_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_kyc: Option<BuyerKyc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_rto: Option<RtoForms>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBuyerDocumentsRequest {
    pub buyer_kyc: Option<BuyerKycPatch>,
    pub buyer_rto: Option<RtoFormsPatch>,
}

/// Partial KYC update: only the supplied lists are replaced.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerKycPatch {
    pub aadhaar: Option<Vec<String>>,
    pub pan: Option<Vec<String>>,
    pub photo: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtoFormsPatch {
    pub form29: Option<Vec<String>>,
    pub form30: Option<Vec<String>>,
    pub form28: Option<Vec<String>>,
    pub form35: Option<Vec<String>>,
}
