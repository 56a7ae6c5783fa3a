pub mod auth;
pub mod cars;
pub mod dashboard;
pub mod documents;
pub mod expenses;
pub mod responses;
pub mod sales;
pub mod sell_requests;
pub mod uploads;
