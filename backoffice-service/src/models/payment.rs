use bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;

/// Classification of a money-movement event. `Loan` marks financing
/// disbursements; the rest are direct payment instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Cash,
    Upi,
    Bank,
    Loan,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Cash => "CASH",
            PaymentType::Upi => "UPI",
            PaymentType::Bank => "BANK",
            PaymentType::Loan => "LOAN",
        }
    }
}

/// Instrument used for the direct portion of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    Cash,
    Upi,
    Bank,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "CASH",
            PaymentMode::Upi => "UPI",
            PaymentMode::Bank => "BANK",
        }
    }
}

/// One immutable money-movement entry against a sale.
///
/// `paid_till_now` / `remaining_after_payment` are the sale's running totals
/// captured at write time; they are never recomputed, so each entry is a
/// point-in-time audit record independent of later sale mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub sale_id: Uuid,
    pub car_id: Uuid,
    pub amount: Money,
    pub payment_type: PaymentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_mode: Option<PaymentMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub payment_date: DateTime,
    pub paid_till_now: Money,
    pub remaining_after_payment: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    pub invoice_date: DateTime,
    pub created_at: DateTime,
}
