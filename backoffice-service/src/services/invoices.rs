//! Receipt and final-invoice documents. Rendering happens strictly after
//! the ledger mutation commits; a storage failure surfaces only on the
//! document endpoints, never on the payment write.

use std::fmt::Write as _;
use std::sync::Arc;

use service_core::error::AppError;

use crate::config::DealershipConfig;

use super::ledger::{FinalInvoiceView, ReceiptView};
use super::storage::Storage;

#[derive(Clone)]
pub struct InvoiceService {
    storage: Arc<dyn Storage>,
    dealership: DealershipConfig,
}

pub struct StoredDocument {
    pub url: String,
    pub file_name: String,
}

fn format_date(dt: bson::DateTime) -> String {
    dt.to_chrono().format("%d/%m/%Y").to_string()
}

impl InvoiceService {
    pub fn new(storage: Arc<dyn Storage>, dealership: DealershipConfig) -> Self {
        Self {
            storage,
            dealership,
        }
    }

    pub fn render_receipt(&self, view: &ReceiptView) -> String {
        let mut out = String::new();
        let payment = &view.payment;
        let sale = &view.sale;
        let car = &view.car;

        let _ = writeln!(out, "{}", self.dealership.name);
        let _ = writeln!(out, "{}", self.dealership.tagline);
        let _ = writeln!(out);
        let _ = writeln!(out, "PAYMENT RECEIPT");
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Invoice No: {}",
            payment.invoice_number.as_deref().unwrap_or("-")
        );
        let _ = writeln!(out, "Date: {}", format_date(payment.invoice_date));
        let _ = writeln!(out);

        let buyer = car.buyer.as_ref();
        let _ = writeln!(
            out,
            "Buyer Name: {}",
            buyer.map(|b| b.name.as_str()).unwrap_or("-")
        );
        let _ = writeln!(
            out,
            "Phone: {}",
            buyer.map(|b| b.phone.as_str()).unwrap_or("-")
        );
        let _ = writeln!(
            out,
            "City: {}",
            buyer.and_then(|b| b.city.as_deref()).unwrap_or("-")
        );
        let _ = writeln!(out);

        let _ = writeln!(
            out,
            "Car: {} {}",
            car.car.brand,
            car.car.variant.as_deref().unwrap_or("")
        );
        let _ = writeln!(out, "Registration No: {}", car.car.registration_number);
        let _ = writeln!(out, "Fuel: {}", car.car.fuel_type);
        let _ = writeln!(out);

        let _ = writeln!(out, "Payment Type: {}", payment.payment_type.as_str());
        let _ = writeln!(
            out,
            "Payment Method: {}",
            payment
                .payment_mode
                .map(|mode| mode.as_str())
                .unwrap_or("-")
        );
        let _ = writeln!(out, "Amount Paid: ₹{}", payment.amount);
        let _ = writeln!(out, "Date: {}", format_date(payment.payment_date));
        let _ = writeln!(out);

        let summary = &sale.payment_summary;
        let _ = writeln!(out, "Total Vehicle Price: ₹{}", summary.total_amount);
        let _ = writeln!(out, "Total Paid: ₹{}", summary.paid_amount);
        let _ = writeln!(out, "Remaining: ₹{}", summary.remaining_amount);
        let _ = writeln!(out, "Status: {}", summary.status.as_str());
        let _ = writeln!(out);
        let _ = writeln!(out, "Thank you for your business!");
        let _ = writeln!(out, "This is a system generated receipt.");

        out
    }

    pub fn render_final_invoice(&self, view: &FinalInvoiceView) -> String {
        let mut out = String::new();
        let sale = &view.sale;
        let car = &view.car;

        let _ = writeln!(out, "{}", self.dealership.name);
        let _ = writeln!(out, "{}", self.dealership.tagline);
        let _ = writeln!(out);
        let _ = writeln!(out, "FINAL INVOICE");
        let _ = writeln!(out);
        let _ = writeln!(out, "Invoice No: {}", view.final_invoice_number);
        let _ = writeln!(out, "Sale ID: {}", sale.id);
        let _ = writeln!(out, "Date: {}", format_date(view.generated_at));
        let _ = writeln!(out);

        let _ = writeln!(out, "Buyer Name: {}", sale.buyer.name);
        let _ = writeln!(out, "Phone: {}", sale.buyer.phone);
        let _ = writeln!(out, "City: {}", sale.buyer.city.as_deref().unwrap_or("-"));
        let _ = writeln!(out);

        let _ = writeln!(
            out,
            "Car: {} {}",
            car.car.brand,
            car.car.variant.as_deref().unwrap_or("")
        );
        let _ = writeln!(out, "Year: {}", car.car.year);
        let _ = writeln!(out, "Registration No: {}", car.car.registration_number);
        let _ = writeln!(out, "Fuel: {}", car.car.fuel_type);
        let _ = writeln!(out);

        let summary = &sale.payment_summary;
        let _ = writeln!(out, "Total Amount: ₹{}", summary.total_amount);
        let _ = writeln!(out, "Paid Amount: ₹{}", summary.paid_amount);
        let _ = writeln!(out, "Status: {}", summary.status.as_str());
        let _ = writeln!(out);

        if !view.payments.is_empty() {
            let _ = writeln!(out, "Payment History");
            for (index, payment) in view.payments.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{}. ₹{} - {} ({})",
                    index + 1,
                    payment.amount,
                    payment.payment_type.as_str(),
                    format_date(payment.payment_date)
                );
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "Thank you for your business!");
        let _ = writeln!(out, "This is a system generated invoice.");

        out
    }

    /// Renders the receipt and writes it to the document store, returning
    /// the locator.
    pub async fn store_receipt(&self, view: &ReceiptView) -> Result<StoredDocument, AppError> {
        let body = self.render_receipt(view);
        let file_name = format!("Payment-Invoice-{}.txt", view.payment.id);
        let key = format!("car-invoices/payments/{file_name}");
        self.storage.upload(&key, body.into_bytes()).await?;
        tracing::info!(payment_id = %view.payment.id, key, "payment receipt stored");
        Ok(StoredDocument {
            url: format!("/files/{key}"),
            file_name,
        })
    }

    /// Renders the consolidated invoice and writes it to the document store.
    pub async fn store_final_invoice(
        &self,
        view: &FinalInvoiceView,
    ) -> Result<StoredDocument, AppError> {
        let body = self.render_final_invoice(view);
        let file_name = format!("Final-Invoice-{}.txt", view.sale.id);
        let key = format!("car-invoices/final/{file_name}");
        self.storage.upload(&key, body.into_bytes()).await?;
        tracing::info!(sale_id = %view.sale.id, key, "final invoice stored");
        Ok(StoredDocument {
            url: format!("/files/{key}"),
            file_name,
        })
    }
}
