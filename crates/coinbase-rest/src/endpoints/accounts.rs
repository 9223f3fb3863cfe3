//! Account endpoints

use crate::client::CoinbaseRestClient;
use crate::error::RestResult;
use crate::query::with_query;
use crate::types::Pagination;
use serde_json::Value;
use tracing::instrument;

/// Account endpoints
pub struct AccountEndpoints<'a> {
    client: &'a CoinbaseRestClient,
}

impl<'a> AccountEndpoints<'a> {
    pub fn new(client: &'a CoinbaseRestClient) -> Self {
        Self { client }
    }

    /// List all trading accounts
    #[instrument(skip(self))]
    pub async fn list(&self) -> RestResult<Value> {
        self.client.get("accounts").await
    }

    /// Get a single account
    ///
    /// # Arguments
    /// * `account_id` - Account UUID
    #[instrument(skip(self))]
    pub async fn get(&self, account_id: &str) -> RestResult<Value> {
        self.client.get(&format!("accounts/{}", account_id)).await
    }

    /// Get account activity (ledger entries)
    #[instrument(skip(self))]
    pub async fn ledger(&self, account_id: &str, page: &Pagination) -> RestResult<Value> {
        let path = with_query(&format!("accounts/{}/ledger", account_id), Some(page))?;
        self.client.get(&path).await
    }

    /// Get holds placed on an account by open orders
    #[instrument(skip(self))]
    pub async fn holds(&self, account_id: &str, page: &Pagination) -> RestResult<Value> {
        let path = with_query(&format!("accounts/{}/holds", account_id), Some(page))?;
        self.client.get(&path).await
    }
}
