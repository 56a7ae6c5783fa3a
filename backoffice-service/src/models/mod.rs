pub mod admin;
pub mod car;
pub mod expense;
pub mod loan;
pub mod masters;
pub mod money;
pub mod payment;
pub mod sale;
pub mod sell_request;
pub mod upload;

pub use admin::Admin;
pub use car::{Buyer, BuyerKyc, Car, CarStatus, PaymentInfo, RtoForms, SaleSnapshot};
pub use expense::Expense;
pub use loan::{Loan, LoanStatus};
pub use masters::{DocumentLabel, ExpenseLabel};
pub use money::Money;
pub use payment::{Payment, PaymentMode, PaymentType};
pub use sale::{
    plan_initial_payments, AppliedPayment, InitialPayment, LedgerError, PaymentSummary,
    PlannedPayment, Sale, SaleStatus,
};
pub use sell_request::{
    DocumentAttachment, ExpenseLine, RcDetails, RcOwner, Seller, SellerType, SellRequest,
    SellRequestStatus, Source, Vehicle,
};
pub use upload::StoredFile;
