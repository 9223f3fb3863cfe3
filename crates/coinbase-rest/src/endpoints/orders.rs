//! Order management endpoints

use crate::client::CoinbaseRestClient;
use crate::error::RestResult;
use crate::query::with_query;
use crate::types::{NewOrder, OrderFilter};
use serde_json::Value;
use tracing::{debug, instrument};

/// Order management endpoints
pub struct OrderEndpoints<'a> {
    client: &'a CoinbaseRestClient,
}

impl<'a> OrderEndpoints<'a> {
    pub fn new(client: &'a CoinbaseRestClient) -> Self {
        Self { client }
    }

    /// List orders
    ///
    /// With an empty filter the exchange returns open and pending orders.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &OrderFilter) -> RestResult<Value> {
        let path = with_query("orders", Some(filter))?;
        self.client.get(&path).await
    }

    /// Get a single order by server id
    #[instrument(skip(self))]
    pub async fn get(&self, order_id: &str) -> RestResult<Value> {
        self.client.get(&format!("orders/{}", order_id)).await
    }

    /// Get a single order by the caller-chosen `client_oid`
    #[instrument(skip(self))]
    pub async fn get_by_client_oid(&self, client_oid: &str) -> RestResult<Value> {
        self.client.get(&format!("orders/client:{}", client_oid)).await
    }

    /// Place a new order
    #[instrument(skip(self))]
    pub async fn place(&self, order: &NewOrder) -> RestResult<Value> {
        debug!(
            "Placing {:?} {:?} order on {}",
            order.side, order.order_type, order.product_id
        );
        self.client.post("orders", order).await
    }

    /// Cancel an order by server id
    #[instrument(skip(self))]
    pub async fn cancel(&self, order_id: &str) -> RestResult<Value> {
        self.client.delete(&format!("orders/{}", order_id)).await
    }

    /// Cancel all open orders, optionally for one product only
    #[instrument(skip(self))]
    pub async fn cancel_all(&self, product_id: Option<&str>) -> RestResult<Value> {
        let options = product_id.map(|id| [("product_id", id)]);
        let path = with_query("orders", options.as_ref().map(|o| &o[..]))?;
        self.client.delete(&path).await
    }
}
