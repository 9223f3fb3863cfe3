//! API endpoint implementations

pub mod accounts;
pub mod orders;

pub use accounts::AccountEndpoints;
pub use orders::OrderEndpoints;
