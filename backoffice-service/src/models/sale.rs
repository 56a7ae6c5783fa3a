use bson::DateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use service_core::error::AppError;

use super::car::Buyer;
use super::money::Money;
use super::payment::{PaymentMode, PaymentType};
use super::sell_request::Vehicle;

/// Business-rule failures raised by the ledger before any mutation happens.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Sold price must be greater than 0")]
    InvalidTotal,

    #[error("Payment amount must be greater than 0")]
    InvalidAmount,

    #[error("Total paid amount ({paid}) cannot exceed sold price ({total})")]
    InitialExceedsTotal { paid: Money, total: Money },

    #[error("Payment amount ({amount}) cannot exceed remaining balance ({remaining})")]
    Overpayment { amount: Money, remaining: Money },

    #[error("Payment amount is out of range")]
    AmountOutOfRange,
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Overpayment { .. } => AppError::Overpayment(anyhow::Error::new(err)),
            _ => AppError::Validation(anyhow::Error::new(err)),
        }
    }
}

/// Payment state of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    Paid,
    Partial,
    Pending,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Paid => "PAID",
            SaleStatus::Partial => "PARTIAL",
            SaleStatus::Pending => "PENDING",
        }
    }

    /// The single derivation rule: PAID when nothing remains, PARTIAL when
    /// something was paid, PENDING otherwise. Every status in the system
    /// comes from here.
    pub fn derive(paid_amount: Money, total_amount: Money) -> SaleStatus {
        if paid_amount.is_zero() {
            SaleStatus::Pending
        } else if paid_amount == total_amount {
            SaleStatus::Paid
        } else {
            SaleStatus::Partial
        }
    }
}

/// Running balance of a sale. `version` is the optimistic-concurrency token
/// bumped by every applied payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub total_amount: Money,
    pub paid_amount: Money,
    pub remaining_amount: Money,
    pub status: SaleStatus,
    pub version: i64,
}

/// Result of applying one payment: the successor summary plus the
/// point-in-time snapshot the payment entry must carry.
#[derive(Debug, Clone)]
pub struct AppliedPayment {
    pub summary: PaymentSummary,
    pub paid_till_now: Money,
    pub remaining_after_payment: Money,
}

impl PaymentSummary {
    pub fn new(total_amount: Money) -> Result<Self, LedgerError> {
        if !total_amount.is_positive() {
            return Err(LedgerError::InvalidTotal);
        }
        Ok(PaymentSummary {
            total_amount,
            paid_amount: Money::ZERO,
            remaining_amount: total_amount,
            status: SaleStatus::Pending,
            version: 1,
        })
    }

    /// Applies one payment against this summary. Rejects non-positive
    /// amounts and anything above the remaining balance; the receiver is
    /// untouched on failure.
    pub fn apply(&self, amount: Money) -> Result<AppliedPayment, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount);
        }
        if amount > self.remaining_amount {
            return Err(LedgerError::Overpayment {
                amount,
                remaining: self.remaining_amount,
            });
        }

        let paid_till_now = self
            .paid_amount
            .checked_add(amount)
            .ok_or(LedgerError::AmountOutOfRange)?;
        let remaining_after_payment = self
            .total_amount
            .checked_sub(paid_till_now)
            .ok_or(LedgerError::AmountOutOfRange)?;

        Ok(AppliedPayment {
            summary: PaymentSummary {
                total_amount: self.total_amount,
                paid_amount: paid_till_now,
                remaining_amount: remaining_after_payment,
                status: SaleStatus::derive(paid_till_now, self.total_amount),
                version: self.version + 1,
            },
            paid_till_now,
            remaining_after_payment,
        })
    }
}

/// One settlement leg supplied at sale time, before snapshots are assigned.
#[derive(Debug, Clone)]
pub struct InitialPayment {
    pub amount: Money,
    pub payment_type: PaymentType,
    pub payment_mode: Option<PaymentMode>,
    pub note: Option<String>,
}

/// A sale-time payment entry ready for insertion, snapshot included.
#[derive(Debug, Clone)]
pub struct PlannedPayment {
    pub amount: Money,
    pub payment_type: PaymentType,
    pub payment_mode: Option<PaymentMode>,
    pub note: Option<String>,
    pub paid_till_now: Money,
    pub remaining_after_payment: Money,
}

/// Folds the sale-time settlement legs into the opening summary plus ordered
/// payment entries. Legs are applied in the order given (direct payment
/// before loan disbursement); zero legs are dropped, negative ones rejected,
/// and the summed legs must not exceed the sold price.
pub fn plan_initial_payments(
    total_amount: Money,
    legs: Vec<InitialPayment>,
) -> Result<(PaymentSummary, Vec<PlannedPayment>), LedgerError> {
    let mut summary = PaymentSummary::new(total_amount)?;
    let mut planned = Vec::new();

    for leg in legs {
        if leg.amount.is_negative() {
            return Err(LedgerError::InvalidAmount);
        }
        if leg.amount.is_zero() {
            continue;
        }

        let applied = summary.apply(leg.amount).map_err(|err| match err {
            LedgerError::Overpayment { .. } => LedgerError::InitialExceedsTotal {
                paid: summary.paid_amount.saturating_add(leg.amount),
                total: total_amount,
            },
            other => other,
        })?;

        planned.push(PlannedPayment {
            amount: leg.amount,
            payment_type: leg.payment_type,
            payment_mode: leg.payment_mode,
            note: leg.note,
            paid_till_now: applied.paid_till_now,
            remaining_after_payment: applied.remaining_after_payment,
        });
        summary = applied.summary;
    }

    // The sale is born at version 1 regardless of how many legs settled it.
    summary.version = 1;
    Ok((summary, planned))
}

/// One vehicle transaction: fixed sold price, running payment state, and
/// snapshots of the vehicle and buyer as they were at sale time. Never
/// deleted; mutated only through payment application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub car_id: Uuid,
    pub car: Vehicle,
    pub buyer: Buyer,
    pub sold_price: Money,
    pub sale_date: DateTime,
    pub payment_summary: PaymentSummary,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}
