use bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;
use super::payment::{PaymentMode, PaymentType};
use super::sell_request::{DocumentAttachment, ExpenseLine, RcDetails, Seller, Source, Vehicle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarStatus {
    Live,
    Sold,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Buyer KYC document locators collected at sale time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerKyc {
    pub aadhaar: Vec<String>,
    pub pan: Vec<String>,
    pub photo: Vec<String>,
}

/// RTO transfer form locators. Forms 29/30 are mandatory for transfer;
/// 28/35 only apply to inter-state moves and hypothecation release.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtoForms {
    pub form29: Vec<String>,
    pub form30: Vec<String>,
    #[serde(default)]
    pub form28: Vec<String>,
    #[serde(default)]
    pub form35: Vec<String>,
}

/// Sale-time settlement snapshot kept on the inventory record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub cash_paid: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_payment_mode: Option<PaymentMode>,
    pub loan_total: Money,
    pub loan_paid_now: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finance_company: Option<String>,
}

/// One-time financial snapshot written when the car is marked sold. Later
/// payments update the Sale, not this mirror.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleSnapshot {
    pub total_amount: Money,
    pub paid_amount: Money,
    pub remaining_amount: Money,
}

/// A live inventory record created when a sell request is approved. Carries
/// the full request snapshot and, once sold, the buyer and settlement data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub sell_request_id: Uuid,
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
    pub status: CarStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<Buyer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sold_at: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_kyc: Option<BuyerKyc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_rto: Option<RtoForms>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale: Option<SaleSnapshot>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Car {
    /// Builds the live inventory record from an approved request.
    pub fn from_approved_request(request: &super::sell_request::SellRequest) -> Car {
        let now = DateTime::now();
        Car {
            id: Uuid::new_v4(),
            sell_request_id: request.id,
            source: request.source,
            seller: request.seller.clone(),
            car: request.car.clone(),
            admin_expenses: request.admin_expenses.clone(),
            seller_documents: request.seller_documents.clone(),
            seller_price: request.seller_price,
            admin_selling_price: request.admin_selling_price,
            rc_details: request.rc_details.clone(),
            status: CarStatus::Live,
            buyer: None,
            buyer_price: None,
            sold_at: None,
            buyer_kyc: None,
            buyer_rto: None,
            payment: None,
            sale: None,
            created_at: now,
            updated_at: now,
        }
    }
}
