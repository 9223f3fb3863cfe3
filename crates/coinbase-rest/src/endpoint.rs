//! Coinbase Exchange endpoint definitions

use std::fmt;

/// Coinbase Exchange environments
///
/// Chosen once, when the client is configured. The streaming feed URL is
/// exposed here so a websocket client can share the same selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Live trading (default)
    #[default]
    Production,
    /// Public sandbox for testing
    Sandbox,
}

impl Environment {
    /// Pick the environment from a sandbox flag
    pub fn from_sandbox(sandbox: bool) -> Self {
        if sandbox {
            Self::Sandbox
        } else {
            Self::Production
        }
    }

    /// Get the REST base URL for this environment
    pub fn rest_url(&self) -> &'static str {
        match self {
            Self::Production => "https://api.pro.coinbase.com",
            Self::Sandbox => "https://api-public.sandbox.pro.coinbase.com",
        }
    }

    /// Get the websocket feed URL for this environment
    pub fn feed_url(&self) -> &'static str {
        match self {
            Self::Production => "wss://ws-feed.pro.coinbase.com",
            Self::Sandbox => "wss://ws-feed-public.sandbox.pro.coinbase.com",
        }
    }

    /// Check if this is the sandbox
    pub fn is_sandbox(&self) -> bool {
        matches!(self, Self::Sandbox)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rest_url())
    }
}
