pub mod invoices;
pub mod jwt;
pub mod ledger;
pub mod password;
pub mod repository;
pub mod storage;

pub use invoices::InvoiceService;
pub use jwt::JwtService;
pub use ledger::SaleLedger;
pub use repository::Repository;
pub use storage::{LocalStorage, Storage};
