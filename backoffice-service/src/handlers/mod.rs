pub mod auth;
pub mod cars;
pub mod dashboard;
pub mod documents;
pub mod expenses;
pub mod health;
pub mod payments;
pub mod sales;
pub mod sell_requests;
pub mod uploads;
