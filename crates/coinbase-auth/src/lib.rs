//! Credentials and request signing for the Coinbase Exchange REST API
//!
//! Every private request carries four headers: the API key, the passphrase,
//! a timestamp in seconds and a signature. The signature is the base64
//! encoded HMAC-SHA256 of `timestamp + method + path + body`, keyed with the
//! base64-decoded API secret.
//!
//! # Example
//!
//! ```
//! use coinbase_auth::{Credentials, RequestSigner};
//!
//! # fn main() -> Result<(), coinbase_auth::AuthError> {
//! let creds = Credentials::new("key", "c2VjcmV0", "passphrase")?;
//!
//! let signer = RequestSigner::new(&creds, "GET", "accounts", Some(1_000));
//! assert_eq!(signer.path(), "/accounts");
//!
//! let signature = signer.sign(None);
//! assert_eq!(signature, creds.sign("GET", "accounts", None, 1_000));
//! # Ok(())
//! # }
//! ```

mod credentials;
mod error;

pub use credentials::{current_timestamp, normalize_path, prehash, Credentials, RequestSigner};
pub use error::{AuthError, AuthResult};
