//! API projections of the persisted entities. BSON datetimes are rendered as
//! RFC 3339 strings at the boundary.

use bson::DateTime;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    Buyer, BuyerKyc, Car, CarStatus, DocumentAttachment, Expense, ExpenseLine, Loan, LoanStatus,
    Money, Payment, PaymentInfo, PaymentMode, PaymentSummary, PaymentType, RcDetails, RtoForms,
    Sale, SaleSnapshot, SaleStatus, Seller, SellRequest, SellRequestStatus, Source, Vehicle,
};

pub fn format_datetime(dt: DateTime) -> String {
    dt.to_chrono().to_rfc3339()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummaryResponse {
    pub total_amount: Money,
    pub paid_amount: Money,
    pub remaining_amount: Money,
    pub status: SaleStatus,
}

impl From<&PaymentSummary> for PaymentSummaryResponse {
    fn from(summary: &PaymentSummary) -> Self {
        Self {
            total_amount: summary.total_amount,
            paid_amount: summary.paid_amount,
            remaining_amount: summary.remaining_amount,
            status: summary.status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub car_id: Uuid,
    pub amount: Money,
    pub payment_type: PaymentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_mode: Option<PaymentMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub payment_date: String,
    pub paid_till_now: Money,
    pub remaining_after_payment: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    pub invoice_date: String,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            sale_id: payment.sale_id,
            car_id: payment.car_id,
            amount: payment.amount,
            payment_type: payment.payment_type,
            payment_mode: payment.payment_mode,
            note: payment.note,
            payment_date: format_datetime(payment.payment_date),
            paid_till_now: payment.paid_till_now,
            remaining_after_payment: payment.remaining_after_payment,
            invoice_number: payment.invoice_number,
            invoice_date: format_datetime(payment.invoice_date),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub id: Uuid,
    pub car_id: Uuid,
    pub car: Vehicle,
    pub buyer: Buyer,
    pub sold_price: Money,
    pub sale_date: String,
    pub payment_summary: PaymentSummaryResponse,
    pub created_at: String,
}

impl From<Sale> for SaleResponse {
    fn from(sale: Sale) -> Self {
        Self {
            id: sale.id,
            car_id: sale.car_id,
            car: sale.car,
            buyer: sale.buyer,
            sold_price: sale.sold_price,
            sale_date: format_datetime(sale.sale_date),
            payment_summary: PaymentSummaryResponse::from(&sale.payment_summary),
            created_at: format_datetime(sale.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarResponse {
    pub id: Uuid,
    pub sell_request_id: Uuid,
    pub source: Source,
    pub seller: Seller,
    pub car: Vehicle,
    pub admin_expenses: Vec<ExpenseLine>,
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
    pub sold_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_kyc: Option<BuyerKyc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_rto: Option<RtoForms>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale: Option<SaleSnapshot>,
    pub created_at: String,
}

impl From<Car> for CarResponse {
    fn from(car: Car) -> Self {
        Self {
            id: car.id,
            sell_request_id: car.sell_request_id,
            source: car.source,
            seller: car.seller,
            car: car.car,
            admin_expenses: car.admin_expenses,
            seller_documents: car.seller_documents,
            seller_price: car.seller_price,
            admin_selling_price: car.admin_selling_price,
            rc_details: car.rc_details,
            status: car.status,
            buyer: car.buyer,
            buyer_price: car.buyer_price,
            sold_at: car.sold_at.map(format_datetime),
            buyer_kyc: car.buyer_kyc,
            buyer_rto: car.buyer_rto,
            payment: car.payment,
            sale: car.sale,
            created_at: format_datetime(car.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellRequestResponse {
    pub id: Uuid,
    pub source: Source,
    pub seller: Seller,
    pub car: Vehicle,
    pub admin_expenses: Vec<ExpenseLine>,
    pub seller_documents: Vec<DocumentAttachment>,
    pub seller_price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_selling_price: Option<Money>,
    pub rc_details: RcDetails,
    pub status: SellRequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SellRequest> for SellRequestResponse {
    fn from(request: SellRequest) -> Self {
        Self {
            id: request.id,
            source: request.source,
            seller: request.seller,
            car: request.car,
            admin_expenses: request.admin_expenses,
            seller_documents: request.seller_documents,
            seller_price: request.seller_price,
            admin_selling_price: request.admin_selling_price,
            rc_details: request.rc_details,
            status: request.status,
            reject_reason: request.reject_reason,
            created_at: format_datetime(request.created_at),
            updated_at: format_datetime(request.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResponse {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub car_id: Uuid,
    pub loan_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finance_company: Option<String>,
    pub status: LoanStatus,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            id: loan.id,
            sale_id: loan.sale_id,
            car_id: loan.car_id,
            loan_amount: loan.loan_amount,
            finance_company: loan.finance_company,
            status: loan.status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub person: String,
    pub title: String,
    pub amount: Money,
    pub category: String,
    pub date: String,
}

impl From<Expense> for ExpenseResponse {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id,
            person: expense.person,
            title: expense.title,
            amount: expense.amount,
            category: expense.category,
            date: format_datetime(expense.date),
        }
    }
}
