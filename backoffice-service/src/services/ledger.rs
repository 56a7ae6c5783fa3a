//! The sale ledger: turns a vehicle-sold event into a consistent, auditable
//! sequence of payment records and keeps the running balance correct under
//! concurrent submissions.

use bson::DateTime;
use chrono::Datelike;
use uuid::Uuid;

use service_core::error::AppError;

use crate::dtos::cars::MarkSoldRequest;
use crate::dtos::sales::AddPaymentRequest;
use crate::models::{
    plan_initial_payments, AppliedPayment, Buyer, BuyerKyc, Car, CarStatus, InitialPayment, Loan,
    LoanStatus, Money, Payment, PaymentInfo, PaymentMode, PaymentSummary, PaymentType, RtoForms,
    Sale, SaleSnapshot, SaleStatus,
};

use super::repository::Repository;

/// Bound on optimistic-concurrency retries before giving up with a conflict.
const MAX_CAS_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct SaleLedger {
    repo: Repository,
}

/// Outcome of marking a car sold.
pub struct RecordedSale {
    pub car: Car,
    pub sale: Sale,
}

/// Read-only projection of a sale with its ordered payment history.
pub struct LedgerView {
    pub sale: Sale,
    pub car: Car,
    pub payments: Vec<Payment>,
    pub loan: Option<Loan>,
}

/// Consolidated invoice projection, producible only once fully paid.
pub struct FinalInvoiceView {
    pub final_invoice_number: String,
    pub sale: Sale,
    pub car: Car,
    pub payments: Vec<Payment>,
    pub generated_at: DateTime,
}

/// Single-payment receipt projection.
pub struct ReceiptView {
    pub payment: Payment,
    pub sale: Sale,
    pub car: Car,
}

/// `INV-{year}-{seq}` with a four-digit zero-padded sequence.
pub fn format_invoice_number(year: i32, sequence: i64) -> String {
    format!("INV-{year}-{sequence:04}")
}

/// Final invoice numbers are derived from the sale id, so regenerating the
/// projection always yields the same number.
pub fn final_invoice_number(year: i32, sale_id: Uuid) -> String {
    let hex = sale_id.simple().to_string();
    let tail = &hex[hex.len() - 5..];
    format!("FIN-{year}-{}", tail.to_uppercase())
}

fn direct_payment_mode(payment_type: PaymentType) -> Option<PaymentMode> {
    match payment_type {
        PaymentType::Cash => Some(PaymentMode::Cash),
        PaymentType::Upi => Some(PaymentMode::Upi),
        PaymentType::Bank => Some(PaymentMode::Bank),
        PaymentType::Loan => None,
    }
}

impl SaleLedger {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Creates the Sale for a vehicle-sold event: validates everything up
    /// front, plans the initial settlement legs (direct payment first, loan
    /// disbursement second), then persists sale, payment entries, loan
    /// record and the terminal inventory update.
    pub async fn record_sale(
        &self,
        car_id: Uuid,
        request: MarkSoldRequest,
    ) -> Result<RecordedSale, AppError> {
        let buyer_name = request
            .buyer_details
            .buyer_name
            .filter(|name| !name.trim().is_empty());
        let buyer_phone = request
            .buyer_details
            .buyer_phone
            .filter(|phone| !phone.trim().is_empty());
        let (buyer_name, buyer_phone, sold_price) =
            match (buyer_name, buyer_phone, request.buyer_details.sold_price) {
                (Some(name), Some(phone), Some(price)) => (name, phone, price),
                _ => {
                    return Err(AppError::Validation(anyhow::anyhow!(
                        "buyerName, buyerPhone and soldPrice are required"
                    )))
                }
            };
        if !sold_price.is_positive() {
            return Err(AppError::Validation(anyhow::anyhow!("Invalid sold price")));
        }

        let payment_type = request.payment.payment_type.unwrap_or(PaymentType::Cash);
        let cash_paid = request.payment.cash_paid;
        let loan_total = request.payment.loan_total;
        let loan_paid_now = request.payment.loan_paid_now;

        if cash_paid.is_negative() || loan_total.is_negative() || loan_paid_now.is_negative() {
            return Err(AppError::Validation(anyhow::anyhow!(
                "Payment amounts cannot be negative"
            )));
        }
        if payment_type == PaymentType::Loan {
            if !loan_total.is_positive() {
                return Err(AppError::Validation(anyhow::anyhow!(
                    "Loan total amount is required for loan payment"
                )));
            }
        } else if !cash_paid.is_positive() {
            return Err(AppError::Validation(anyhow::anyhow!("Paid amount is required")));
        }

        if request.buyer_kyc.aadhaar.is_empty()
            || request.buyer_kyc.pan.is_empty()
            || request.buyer_kyc.photo.is_empty()
        {
            return Err(AppError::Validation(anyhow::anyhow!(
                "Buyer Aadhaar, PAN and Photo documents are required"
            )));
        }
        if request.buyer_rto.form29.is_empty() || request.buyer_rto.form30.is_empty() {
            return Err(AppError::Validation(anyhow::anyhow!(
                "Form 29 and Form 30 are required"
            )));
        }

        let sale_date = match &request.buyer_details.sale_date {
            Some(raw) => chrono::DateTime::parse_from_rfc3339(raw)
                .map(|dt| DateTime::from_chrono(dt.with_timezone(&chrono::Utc)))
                .map_err(|_| AppError::Validation(anyhow::anyhow!("Invalid sale date")))?,
            None => DateTime::now(),
        };

        let mut car = self
            .repo
            .find_car(car_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Car not found")))?;
        if car.status == CarStatus::Sold {
            return Err(AppError::Precondition(anyhow::anyhow!(
                "Car is already sold"
            )));
        }

        // Two-phase settlement: the direct payment snapshots first, the
        // financing disbursement second.
        let direct_type = if payment_type == PaymentType::Loan {
            PaymentType::Cash
        } else {
            payment_type
        };
        let direct_mode = if payment_type == PaymentType::Loan {
            Some(request.payment.cash_payment_mode.unwrap_or(PaymentMode::Cash))
        } else {
            direct_payment_mode(payment_type)
        };
        let direct_label = direct_mode.map(|m| m.as_str()).unwrap_or(direct_type.as_str());

        let legs = vec![
            InitialPayment {
                amount: cash_paid,
                payment_type: direct_type,
                payment_mode: direct_mode,
                note: Some(format!("{direct_label} payment received")),
            },
            InitialPayment {
                amount: loan_paid_now,
                payment_type: PaymentType::Loan,
                payment_mode: None,
                note: Some("Loan amount disbursed".to_string()),
            },
        ];
        let (summary, planned) = plan_initial_payments(sold_price, legs)?;

        let buyer = Buyer {
            name: buyer_name,
            phone: buyer_phone,
            email: request.buyer_details.buyer_email.clone(),
            city: request.buyer_details.buyer_city.clone(),
        };

        let now = DateTime::now();
        let sale = Sale {
            id: Uuid::new_v4(),
            car_id: car.id,
            car: car.car.clone(),
            buyer: buyer.clone(),
            sold_price,
            sale_date,
            payment_summary: summary.clone(),
            created_at: now,
            updated_at: now,
        };
        self.repo.insert_sale(&sale).await?;

        for (ordinal, draft) in planned.into_iter().enumerate() {
            // Distinct timestamps keep the audit order stable under sorting.
            let created_at = DateTime::from_millis(now.timestamp_millis() + ordinal as i64);
            let payment = Payment {
                id: Uuid::new_v4(),
                sale_id: sale.id,
                car_id: car.id,
                amount: draft.amount,
                payment_type: draft.payment_type,
                payment_mode: draft.payment_mode,
                note: draft.note,
                payment_date: sale_date,
                paid_till_now: draft.paid_till_now,
                remaining_after_payment: draft.remaining_after_payment,
                invoice_number: None,
                invoice_date: created_at,
                created_at,
            };
            self.repo.insert_payment(&payment).await?;
        }

        let finance_company = request
            .payment
            .finance_company
            .clone()
            .filter(|name| !name.trim().is_empty());
        if payment_type == PaymentType::Loan {
            let loan = Loan {
                id: Uuid::new_v4(),
                sale_id: sale.id,
                car_id: car.id,
                loan_amount: loan_total,
                finance_company: finance_company.clone(),
                status: if loan_paid_now.is_positive() {
                    LoanStatus::Disbursed
                } else {
                    LoanStatus::Applied
                },
                created_at: now,
                updated_at: now,
            };
            self.repo.insert_loan(&loan).await?;
        }

        car.status = CarStatus::Sold;
        car.sold_at = Some(sale_date);
        car.buyer = Some(buyer);
        car.buyer_price = Some(sold_price);
        car.payment = Some(PaymentInfo {
            payment_type,
            cash_paid,
            cash_payment_mode: direct_mode,
            loan_total,
            loan_paid_now,
            finance_company,
        });
        car.buyer_kyc = Some(BuyerKyc {
            aadhaar: request.buyer_kyc.aadhaar,
            pan: request.buyer_kyc.pan,
            photo: request.buyer_kyc.photo,
        });
        car.buyer_rto = Some(RtoForms {
            form29: request.buyer_rto.form29,
            form30: request.buyer_rto.form30,
            form28: request.buyer_rto.form28,
            form35: request.buyer_rto.form35,
        });
        car.admin_expenses.extend(
            request
                .extra_admin_expenses
                .into_iter()
                .filter(|line| !line.label.trim().is_empty() && line.amount.is_positive())
                .map(Into::into),
        );
        car.sale = Some(SaleSnapshot {
            total_amount: sold_price,
            paid_amount: summary.paid_amount,
            remaining_amount: summary.remaining_amount,
        });
        car.updated_at = DateTime::now();
        self.repo.replace_car(&car).await?;

        tracing::info!(
            sale_id = %sale.id,
            car_id = %car.id,
            sold_price = sold_price.minor_units(),
            paid = summary.paid_amount.minor_units(),
            status = summary.status.as_str(),
            "car marked sold"
        );

        Ok(RecordedSale { car, sale })
    }

    /// Applies one further payment to a sale. The running balance is updated
    /// with a compare-and-set on the summary version, so a concurrent
    /// submission re-reads fresh state (and re-runs the overpayment check)
    /// instead of clobbering it. The payment entry and the summary commit
    /// together: a failed insert reverts the summary.
    pub async fn add_payment(
        &self,
        sale_id: Uuid,
        request: AddPaymentRequest,
    ) -> Result<(Payment, PaymentSummary), AppError> {
        if !request.amount.is_positive() {
            return Err(AppError::Validation(anyhow::anyhow!(
                "Payment amount must be greater than 0"
            )));
        }
        let payment_type = request
            .payment_type
            .ok_or_else(|| AppError::Validation(anyhow::anyhow!("paymentType is required")))?;

        let first_read = self
            .repo
            .find_sale(sale_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Sale not found")))?;
        let car = self
            .repo
            .find_car(first_read.car_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Car not found")))?;

        let mut sale = first_read;
        let mut attempts = 0;
        let applied = loop {
            let applied = sale.payment_summary.apply(request.amount)?;
            if self
                .repo
                .update_sale_summary(sale_id, sale.payment_summary.version, &applied.summary)
                .await?
            {
                break applied;
            }

            attempts += 1;
            if attempts >= MAX_CAS_ATTEMPTS {
                return Err(AppError::Conflict(anyhow::anyhow!(
                    "Sale was updated concurrently; retry the payment"
                )));
            }
            tracing::warn!(%sale_id, attempts, "balance update lost the race, re-reading");
            sale = self
                .repo
                .find_sale(sale_id)
                .await?
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Sale not found")))?;
        };

        let now = DateTime::now();
        let year = now.to_chrono().year();
        let invoice_number = match self.repo.next_invoice_sequence(year).await {
            Ok(sequence) => format_invoice_number(year, sequence),
            Err(err) => {
                self.revert_summary(sale_id, &applied, request.amount).await;
                return Err(err);
            }
        };

        let payment = Payment {
            id: Uuid::new_v4(),
            sale_id,
            car_id: car.id,
            amount: request.amount,
            payment_type,
            payment_mode: request.payment_mode,
            note: Some(
                request
                    .note
                    .filter(|note| !note.trim().is_empty())
                    .unwrap_or_else(|| "Additional payment".to_string()),
            ),
            payment_date: now,
            paid_till_now: applied.paid_till_now,
            remaining_after_payment: applied.remaining_after_payment,
            invoice_number: Some(invoice_number),
            invoice_date: now,
            created_at: now,
        };
        if let Err(err) = self.repo.insert_payment(&payment).await {
            self.revert_summary(sale_id, &applied, request.amount).await;
            return Err(err);
        }

        tracing::info!(
            %sale_id,
            payment_id = %payment.id,
            amount = payment.amount.minor_units(),
            paid_till_now = payment.paid_till_now.minor_units(),
            status = applied.summary.status.as_str(),
            "payment recorded"
        );

        Ok((payment, applied.summary))
    }

    /// Best-effort reversal of a committed summary after a failed payment
    /// insert, keeping `paidAmount == sum(payments)` observable. A reversal
    /// that cannot be applied is logged for manual reconciliation.
    async fn revert_summary(&self, sale_id: Uuid, applied: &AppliedPayment, amount: Money) {
        let Some(prior_paid) = applied.summary.paid_amount.checked_sub(amount) else {
            tracing::error!(%sale_id, "summary reversal underflow; manual reconciliation required");
            return;
        };
        let Some(prior_remaining) = applied.summary.remaining_amount.checked_add(amount) else {
            tracing::error!(%sale_id, "summary reversal overflow; manual reconciliation required");
            return;
        };

        let reverted = PaymentSummary {
            total_amount: applied.summary.total_amount,
            paid_amount: prior_paid,
            remaining_amount: prior_remaining,
            status: SaleStatus::derive(prior_paid, applied.summary.total_amount),
            version: applied.summary.version + 1,
        };
        match self
            .repo
            .update_sale_summary(sale_id, applied.summary.version, &reverted)
            .await
        {
            Ok(true) => tracing::warn!(%sale_id, "payment insert failed; summary reverted"),
            Ok(false) => tracing::error!(
                %sale_id,
                "summary reversal raced another writer; manual reconciliation required"
            ),
            Err(err) => tracing::error!(
                %sale_id,
                error = %err,
                "summary reversal failed; manual reconciliation required"
            ),
        }
    }

    /// The sale plus its ordered payment history. No side effects.
    pub async fn ledger(&self, sale_id: Uuid) -> Result<LedgerView, AppError> {
        let sale = self
            .repo
            .find_sale(sale_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Sale not found")))?;
        let car = self
            .repo
            .find_car(sale.car_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Car not found")))?;
        let payments = self.repo.list_payments_for_sale(sale_id).await?;
        let loan = self.repo.find_loan_for_sale(sale_id).await?;

        Ok(LedgerView {
            sale,
            car,
            payments,
            loan,
        })
    }

    /// The consolidated invoice, available only once the balance reaches
    /// zero.
    pub async fn final_invoice(&self, sale_id: Uuid) -> Result<FinalInvoiceView, AppError> {
        let view = self.ledger(sale_id).await?;
        if view.sale.payment_summary.status != SaleStatus::Paid {
            return Err(AppError::Precondition(anyhow::anyhow!(
                "Final invoice available only after full payment"
            )));
        }

        let generated_at = DateTime::now();
        let year = generated_at.to_chrono().year();
        Ok(FinalInvoiceView {
            final_invoice_number: final_invoice_number(year, view.sale.id),
            sale: view.sale,
            car: view.car,
            payments: view.payments,
            generated_at,
        })
    }

    /// Receipt projection for a single payment.
    pub async fn payment_receipt(&self, payment_id: Uuid) -> Result<ReceiptView, AppError> {
        let payment = self
            .repo
            .find_payment(payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Payment not found")))?;
        let sale = self
            .repo
            .find_sale(payment.sale_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Sale not found")))?;
        let car = self
            .repo
            .find_car(payment.car_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Car not found")))?;

        Ok(ReceiptView { payment, sale, car })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_number_format() {
        assert_eq!(format_invoice_number(2026, 1), "INV-2026-0001");
        assert_eq!(format_invoice_number(2026, 42), "INV-2026-0042");
        assert_eq!(format_invoice_number(2026, 12345), "INV-2026-12345");
    }

    #[test]
    fn final_invoice_number_is_stable_per_sale() {
        let sale_id = Uuid::new_v4();
        let first = final_invoice_number(2026, sale_id);
        let second = final_invoice_number(2026, sale_id);
        assert_eq!(first, second);
        assert!(first.starts_with("FIN-2026-"));
        assert_eq!(first.len(), "FIN-2026-".len() + 5);
    }

    #[test]
    fn direct_mode_mirrors_instrument() {
        assert_eq!(direct_payment_mode(PaymentType::Cash), Some(PaymentMode::Cash));
        assert_eq!(direct_payment_mode(PaymentType::Upi), Some(PaymentMode::Upi));
        assert_eq!(direct_payment_mode(PaymentType::Bank), Some(PaymentMode::Bank));
        assert_eq!(direct_payment_mode(PaymentType::Loan), None);
    }
}
