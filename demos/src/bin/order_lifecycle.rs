//! Demo 2: Order Lifecycle
//!
//! Showcases: signed POST/DELETE requests, query helper, typed order bodies
//!
//! Run: COINBASE_SANDBOX=1 cargo run --bin order_lifecycle
//!
//! Places a far-from-market post-only limit order, looks it up, then cancels it.
//! Only ever point this at the sandbox.

use coinbase_rest::{
    with_query, ClientConfig, CoinbaseRestClient, Credentials, Method, NewOrder, OrderFilter,
    OrderStatus, Side,
};
use rust_decimal_macros::dec;
use serde_json::Value;

const PRODUCT: &str = "BTC-USD";

/// Pull the exchange-assigned id out of a placement response
fn order_id(placed: &Value) -> Result<&str, &'static str> {
    placed["id"]
        .as_str()
        .filter(|id| !id.is_empty())
        .ok_or("placement response carried no order id")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("coinbase_rest=debug").init();

    let creds = Credentials::from_env()?;
    let client = CoinbaseRestClient::new(creds, ClientConfig::new().with_sandbox(true))?;

    let order = NewOrder::limit(Side::Buy, PRODUCT, dec!(1.00), dec!(0.001)).with_post_only(true);
    let placed = client.orders().place(&order).await?;
    let id = order_id(&placed)?.to_string();
    println!("Placed order {}", id);

    let open = client
        .orders()
        .list(&OrderFilter::new().status(OrderStatus::Open).product(PRODUCT))
        .await?;
    println!("Open orders: {}", open);

    // No wrapper for fills; go through the dispatcher directly
    let path = with_query("fills", Some(&[("order_id", id.as_str())][..]))?;
    match client.send_request::<()>(Method::GET, &path, None, None).await {
        Ok(fills) => println!("Fills: {}", fills),
        Err(e) => println!("Lookup failed (api: {}): {}", e.is_api(), e),
    }

    let cancelled = client.orders().cancel(&id).await?;
    println!("Cancelled: {}", cancelled);

    Ok(())
}
