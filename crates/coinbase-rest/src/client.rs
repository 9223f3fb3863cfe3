//! Main REST client implementation

use crate::endpoint::Environment;
use crate::endpoints::{AccountEndpoints, OrderEndpoints};
use crate::error::{is_rejection_status, ApiError, RestError, RestResult};
use coinbase_auth::{normalize_path, Credentials, RequestSigner};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Header carrying the API key
pub const HEADER_KEY: &str = "CB-ACCESS-KEY";
/// Header carrying the request signature
pub const HEADER_SIGN: &str = "CB-ACCESS-SIGN";
/// Header carrying the signed timestamp
pub const HEADER_TIMESTAMP: &str = "CB-ACCESS-TIMESTAMP";
/// Header carrying the API passphrase
pub const HEADER_PASSPHRASE: &str = "CB-ACCESS-PASSPHRASE";

/// Environment variable selecting the sandbox
pub const ENV_SANDBOX: &str = "COINBASE_SANDBOX";
/// Environment variable overriding the REST base URL
pub const ENV_API_URL: &str = "COINBASE_API_URL";

/// Coinbase Exchange REST API client
///
/// Signs every request with the configured credentials. Cloning is cheap:
/// clones share the HTTP connection pool and the credentials, neither of
/// which is ever mutated, so any number of calls can be in flight at once.
///
/// # Example
///
/// ```no_run
/// use coinbase_rest::{ClientConfig, CoinbaseRestClient, Credentials};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let creds = Credentials::from_env()?;
///     let client = CoinbaseRestClient::new(creds, ClientConfig::new().with_sandbox(true))?;
///
///     let accounts = client.accounts().list().await?;
///     println!("{}", accounts);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CoinbaseRestClient {
    http_client: Client,
    credentials: Arc<Credentials>,
    base_url: String,
    environment: Environment,
}

impl CoinbaseRestClient {
    /// Create a new client
    ///
    /// # Errors
    /// Returns [`RestError::Http`] if the HTTP client cannot be built.
    pub fn new(credentials: Credentials, config: ClientConfig) -> RestResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_deref().unwrap_or("coinbase-rest/0.1.0"))
            .build()?;

        let base_url = config.base_url().to_string();

        info!(environment = ?config.environment, "Created Coinbase REST client for {}", base_url);

        Ok(Self {
            http_client,
            credentials: Arc::new(credentials),
            base_url,
            environment: config.environment,
        })
    }

    /// Create a client from environment variables
    ///
    /// Credentials come from [`Credentials::from_env`], configuration from
    /// [`ClientConfig::from_env`].
    pub fn from_env() -> RestResult<Self> {
        let credentials = Credentials::from_env()?;
        Self::new(credentials, ClientConfig::from_env())
    }

    /// Get the selected environment
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Get the base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the credentials used for signing
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    // ========================================================================
    // Endpoint groups
    // ========================================================================

    /// Get account endpoints
    pub fn accounts(&self) -> AccountEndpoints<'_> {
        AccountEndpoints::new(self)
    }

    /// Get order endpoints
    pub fn orders(&self) -> OrderEndpoints<'_> {
        OrderEndpoints::new(self)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Send a signed request
    ///
    /// `path` is relative to the base URL and may already carry a query
    /// string (see [`crate::with_query`]); exactly one leading `/` is used.
    /// The URL is parsed before signing, so percent-encoding and `.`/`..`
    /// resolution are applied first and the signed path is the one requested.
    /// The body is serialized once and the same text is signed and sent.
    /// When `timestamp` is `None` the clock is read once and that value is
    /// used for both the signature and the `CB-ACCESS-TIMESTAMP` header.
    ///
    /// # Returns
    /// The decoded response body, unmodified.
    ///
    /// # Errors
    /// - [`RestError::Api`] when the status is between 400 and 500 inclusive
    /// - [`RestError::Http`] on connection failures and timeouts
    /// - [`RestError::Decode`] when the response body is not JSON
    /// - [`RestError::InvalidParameter`] when `path` does not form a valid URL
    ///   or carries a `#` fragment
    pub async fn send_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        timestamp: Option<u64>,
    ) -> RestResult<Value> {
        let (_, value) = self.dispatch(method, path, body, timestamp).await?;
        Ok(value)
    }

    /// Send a signed request and decode the success body into `T`
    pub async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        timestamp: Option<u64>,
    ) -> RestResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let (status, value) = self.dispatch(method, path, body, timestamp).await?;
        serde_json::from_value(value).map_err(|source| RestError::Decode { status, source })
    }

    /// Resolve `path` against the base URL
    fn request_url(&self, path: &str) -> RestResult<Url> {
        let url = Url::parse(&format!("{}{}", self.base_url, normalize_path(path)))
            .map_err(|e| RestError::InvalidParameter(format!("Invalid request path {:?}: {}", path, e)))?;

        if url.fragment().is_some() {
            return Err(RestError::InvalidParameter(format!(
                "Request path {:?} contains a fragment",
                path
            )));
        }

        Ok(url)
    }

    #[instrument(skip(self, body))]
    async fn dispatch<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        timestamp: Option<u64>,
    ) -> RestResult<(u16, Value)> {
        let url = self.request_url(path)?;
        let target = request_target(&url);
        let signer = RequestSigner::new(&self.credentials, method.as_str(), &target, timestamp);

        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(RestError::Serialize)?;

        let signature = signer.sign(body.as_deref());

        debug!(timestamp = signer.timestamp(), "Sending signed request to {}", signer.path());

        let mut request = self
            .http_client
            .request(method, url)
            .header(HEADER_KEY, signer.api_key())
            .header(HEADER_SIGN, signature)
            .header(HEADER_TIMESTAMP, signer.timestamp().to_string())
            .header(HEADER_PASSPHRASE, signer.passphrase());

        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        let result = classify_response(status, &bytes);
        match &result {
            Ok(_) => debug!(status, "Request succeeded"),
            Err(RestError::Api(error)) => {
                warn!(status, kind = %error.kind, "Request rejected: {}", error.message)
            }
            Err(error) => warn!(status, "Failed to read response: {}", error),
        }

        result.map(|value| (status, value))
    }

    /// Send a signed GET request
    pub async fn get(&self, path: &str) -> RestResult<Value> {
        self.send_request::<()>(Method::GET, path, None, None).await
    }

    /// Send a signed POST request with a JSON body
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> RestResult<Value> {
        self.send_request(Method::POST, path, Some(body), None).await
    }

    /// Send a signed DELETE request
    pub async fn delete(&self, path: &str) -> RestResult<Value> {
        self.send_request::<()>(Method::DELETE, path, None, None).await
    }
}

impl std::fmt::Debug for CoinbaseRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinbaseRestClient")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish()
    }
}

/// Path and query of `url`, exactly as they go on the request line
pub(crate) fn request_target(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Classify a raw response into a success value or an error
///
/// An empty body decodes to `null`. Any other body that is not JSON is a
/// [`RestError::Decode`], whatever the status.
pub fn classify_response(status: u16, body: &[u8]) -> RestResult<Value> {
    let value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(body).map_err(|source| RestError::Decode { status, source })?
    };

    if is_rejection_status(status) {
        return Err(RestError::Api(ApiError::from_body(status, &value)));
    }

    Ok(value)
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Production or sandbox
    pub environment: Environment,
    /// Overrides the environment's REST URL
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the environment
    ///
    /// `COINBASE_SANDBOX` set to `1`, `true` or `yes` selects the sandbox.
    /// `COINBASE_API_URL`, when set, overrides the base URL.
    pub fn from_env() -> Self {
        let sandbox = std::env::var(ENV_SANDBOX)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let mut config = Self::new().with_sandbox(sandbox);
        if let Ok(url) = std::env::var(ENV_API_URL) {
            config = config.with_base_url(url);
        }
        config
    }

    /// Set the environment
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Select the sandbox or production
    pub fn with_sandbox(self, sandbox: bool) -> Self {
        self.with_environment(Environment::from_sandbox(sandbox))
    }

    /// Override the base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// The base URL requests will be sent to, without a trailing `/`
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.rest_url())
            .trim_end_matches('/')
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
