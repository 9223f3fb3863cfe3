//! Signed async REST client for the Coinbase Exchange API
//!
//! Every request is signed with HMAC-SHA256 (see `coinbase-auth`) and sent
//! without blocking. Each call resolves exactly once, to one of:
//!
//! - the decoded JSON body, unmodified, when the status is outside 400..=500
//! - [`RestError::Api`] carrying an [`ApiError`] when the exchange rejects it
//! - [`RestError::Http`] or [`RestError::Decode`] when the transport fails
//!
//! No call is retried. Calls issued concurrently may complete in any order;
//! await one before issuing the next when ordering matters.
//!
//! # Example
//!
//! ```no_run
//! use coinbase_rest::{with_query, ClientConfig, CoinbaseRestClient, Credentials, Method, RestError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = Credentials::new("key", "c2VjcmV0", "passphrase")?;
//!     let client = CoinbaseRestClient::new(creds, ClientConfig::new().with_sandbox(true))?;
//!
//!     let path = with_query("orders", Some(&[("status", "open")][..]))?;
//!     match client.send_request::<()>(Method::GET, &path, None, None).await {
//!         Ok(orders) => println!("Open orders: {}", orders),
//!         Err(RestError::Api(e)) => println!("Rejected: {} ({})", e.message, e.kind),
//!         Err(e) => println!("Transport failure: {}", e),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod endpoint;
pub mod endpoints;
pub mod error;
pub mod query;
pub mod types;

// Re-export main types
pub use client::{classify_response, ClientConfig, CoinbaseRestClient};
pub use coinbase_auth::{AuthError, Credentials};
pub use endpoint::Environment;
pub use error::{ApiError, ApiErrorKind, RestError, RestResult};
pub use query::with_query;
pub use reqwest::Method;

pub use types::{NewOrder, OrderFilter, OrderStatus, OrderType, Pagination, Side, TimeInForce};
