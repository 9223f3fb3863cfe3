//! Authentication credentials for the Coinbase Exchange API
//!
//! Implements the HMAC-SHA256 signing scheme used by private endpoints.
//!
//! # Security
//!
//! The decoded secret and the passphrase are stored using the `secrecy` crate which:
//! - Zeroizes memory on drop
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretBox, SecretString};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "COINBASE_API_KEY";
/// Environment variable holding the base64 API secret
pub const ENV_API_SECRET: &str = "COINBASE_API_SECRET";
/// Environment variable holding the API passphrase
pub const ENV_API_PASSPHRASE: &str = "COINBASE_API_PASSPHRASE";

/// Current wall-clock time in whole seconds since the Unix epoch
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs()
}

/// Normalize a request path to start with exactly one `/`
///
/// ```
/// use coinbase_auth::normalize_path;
///
/// assert_eq!(normalize_path("accounts"), "/accounts");
/// assert_eq!(normalize_path("//accounts"), "/accounts");
/// ```
pub fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Build the canonical string that gets signed
///
/// The fields are concatenated with no separators. An absent body
/// contributes nothing, not `null` or `{}`.
pub fn prehash(method: &str, path: &str, body: Option<&str>, timestamp: u64) -> String {
    format!(
        "{}{}{}{}",
        timestamp,
        method,
        normalize_path(path),
        body.unwrap_or_default()
    )
}

/// API credentials for authenticated requests
///
/// The secret is decoded once, at construction. Both the decoded secret and
/// the passphrase are zeroized when the Credentials are dropped.
pub struct Credentials {
    /// API key (public)
    api_key: String,
    /// Secret (decoded from base64, zeroized on drop)
    secret: SecretBox<Vec<u8>>,
    /// Passphrase chosen when the key was created
    passphrase: SecretString,
}

impl Credentials {
    /// Create new credentials
    ///
    /// # Arguments
    /// * `api_key` - Your Coinbase API key
    /// * `secret` - Your API secret (base64 encoded string)
    /// * `passphrase` - The passphrase set for the key
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] if the secret is not valid base64.
    pub fn new(
        api_key: impl Into<String>,
        secret: impl AsRef<str>,
        passphrase: impl Into<String>,
    ) -> AuthResult<Self> {
        let decoded = BASE64.decode(secret.as_ref()).map_err(|e| {
            AuthError::InvalidCredentials(format!("Invalid base64 secret: {}", e))
        })?;
        let passphrase: String = passphrase.into();

        Ok(Self {
            api_key: api_key.into(),
            secret: SecretBox::new(Box::new(decoded)),
            passphrase: SecretString::from(passphrase),
        })
    }

    /// Create credentials from environment variables
    ///
    /// Reads `COINBASE_API_KEY`, `COINBASE_API_SECRET` and
    /// `COINBASE_API_PASSPHRASE` from the environment.
    pub fn from_env() -> AuthResult<Self> {
        let read = |name: &str| {
            std::env::var(name).map_err(|_| AuthError::EnvVarNotSet(name.to_string()))
        };

        let creds = Self::new(
            read(ENV_API_KEY)?,
            read(ENV_API_SECRET)?,
            read(ENV_API_PASSPHRASE)?,
        )?;

        debug!("Loaded API credentials from environment");
        Ok(creds)
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the passphrase
    pub fn passphrase(&self) -> &str {
        self.passphrase.expose_secret()
    }

    /// Sign a request
    ///
    /// 1. message = timestamp + method + "/" + path + body
    /// 2. HMAC-SHA256(decoded_secret, message)
    /// 3. Base64 encode the raw digest
    ///
    /// # Arguments
    /// * `method` - HTTP verb as sent (e.g. "GET")
    /// * `path` - Request path including any query string
    /// * `body` - JSON text of the body, exactly as sent
    /// * `timestamp` - Seconds since the epoch, as sent in `CB-ACCESS-TIMESTAMP`
    pub fn sign(&self, method: &str, path: &str, body: Option<&str>, timestamp: u64) -> String {
        let message = prehash(method, path, body, timestamp);

        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret())
            .expect("HMAC can take key of any size");
        mac.update(message.as_bytes());

        BASE64.encode(mac.finalize().into_bytes())
    }
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            secret: SecretBox::new(Box::new(self.secret.expose_secret().clone())),
            passphrase: SecretString::from(self.passphrase.expose_secret().to_owned()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = self
            .api_key
            .char_indices()
            .nth(8)
            .map_or(self.api_key.as_str(), |(i, _)| &self.api_key[..i]);

        f.debug_struct("Credentials")
            .field("api_key", &format!("{}...", shown))
            .field("secret", &"[REDACTED]")
            .field("passphrase", &"[REDACTED]")
            .finish()
    }
}

/// Signer for a single request
///
/// Captures the timestamp once so the signature and the
/// `CB-ACCESS-TIMESTAMP` header always agree.
#[derive(Debug)]
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
    method: String,
    path: String,
    timestamp: u64,
}

impl<'a> RequestSigner<'a> {
    /// Create a new request signer
    ///
    /// When `timestamp` is `None` the clock is read exactly once, here.
    pub fn new(
        credentials: &'a Credentials,
        method: impl Into<String>,
        path: &str,
        timestamp: Option<u64>,
    ) -> Self {
        Self {
            credentials,
            method: method.into(),
            path: normalize_path(path),
            timestamp: timestamp.unwrap_or_else(current_timestamp),
        }
    }

    /// Get the timestamp for this request
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Get the normalized path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the HTTP method
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Get the passphrase
    pub fn passphrase(&self) -> &str {
        self.credentials.passphrase()
    }

    /// Sign the request with the given JSON body text
    pub fn sign(&self, body: Option<&str>) -> String {
        self.credentials
            .sign(&self.method, &self.path, body, self.timestamp)
    }
}
