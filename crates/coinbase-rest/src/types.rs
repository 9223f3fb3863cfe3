//! Request parameter types for the endpoint wrappers

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
    Stop,
}

/// Time in force for limit orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good till canceled
    #[serde(rename = "GTC")]
    GoodTillCanceled,
    /// Good till time (requires `cancel_after`)
    #[serde(rename = "GTT")]
    GoodTillTime,
    /// Immediate or cancel
    #[serde(rename = "IOC")]
    ImmediateOrCancel,
    /// Fill or kill
    #[serde(rename = "FOK")]
    FillOrKill,
}

/// Order status filter for listing orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Pending,
    Active,
    Done,
    All,
}

/// Cursor pagination parameters
///
/// `before` and `after` are cursors taken from entries of a previous page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Filter for listing orders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

impl OrderFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }
}

/// Body for placing a new order
///
/// Decimal fields are sent as strings, as the exchange expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: Side,
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Decimal>,
    /// Quote amount to spend (market orders only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funds: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
    /// Caller-chosen order id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_oid: Option<String>,
}

impl NewOrder {
    /// Create a limit order
    pub fn limit(side: Side, product_id: impl Into<String>, price: Decimal, size: Decimal) -> Self {
        Self {
            order_type: OrderType::Limit,
            side,
            product_id: product_id.into(),
            price: Some(price),
            size: Some(size),
            funds: None,
            time_in_force: None,
            post_only: None,
            client_oid: None,
        }
    }

    /// Create a market order for a base-currency size
    pub fn market(side: Side, product_id: impl Into<String>, size: Decimal) -> Self {
        Self {
            order_type: OrderType::Market,
            side,
            product_id: product_id.into(),
            price: None,
            size: Some(size),
            funds: None,
            time_in_force: None,
            post_only: None,
            client_oid: None,
        }
    }

    /// Create a market order spending a quote-currency amount
    pub fn market_funds(side: Side, product_id: impl Into<String>, funds: Decimal) -> Self {
        Self {
            size: None,
            funds: Some(funds),
            ..Self::market(side, product_id, Decimal::ZERO)
        }
    }

    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = Some(tif);
        self
    }

    pub fn with_post_only(mut self, post_only: bool) -> Self {
        self.post_only = Some(post_only);
        self
    }

    pub fn with_client_oid(mut self, client_oid: impl Into<String>) -> Self {
        self.client_oid = Some(client_oid.into());
        self
    }
}
