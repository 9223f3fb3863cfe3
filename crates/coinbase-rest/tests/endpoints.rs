//! Endpoint wrapper tests: each wrapper maps to a fixed signed path

mod common;

use coinbase_rest::{NewOrder, OrderFilter, OrderStatus, Pagination, Side, TimeInForce};
use common::{assert_signature_matches, TestServer};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn test_account_paths() {
    let server = TestServer::fixed(200, "[]").await;
    let client = server.client();
    let accounts = client.accounts();

    accounts.list().await.unwrap();
    accounts.get("acc-1").await.unwrap();
    accounts
        .ledger("acc-1", &Pagination::new().after("100").limit(2))
        .await
        .unwrap();
    accounts.holds("acc-1", &Pagination::new()).await.unwrap();

    let requests = server.requests();
    let targets: Vec<&str> = requests.iter().map(|r| r.target.as_str()).collect();
    assert_eq!(
        targets,
        vec![
            "/accounts",
            "/accounts/acc-1",
            "/accounts/acc-1/ledger?after=100&limit=2",
            "/accounts/acc-1/holds",
        ]
    );
    for request in &requests {
        assert_eq!(request.method, "GET");
        assert_signature_matches(request);
    }
}

#[tokio::test]
async fn test_order_listing_and_lookup() {
    let server = TestServer::fixed(200, "[]").await;
    let client = server.client();
    let orders = client.orders();

    orders.list(&OrderFilter::new()).await.unwrap();
    orders
        .list(&OrderFilter::new().status(OrderStatus::Done).product("ETH-USD"))
        .await
        .unwrap();
    orders.get("ord-1").await.unwrap();
    orders.get_by_client_oid("my-oid").await.unwrap();

    let requests = server.requests();
    let targets: Vec<&str> = requests.iter().map(|r| r.target.as_str()).collect();
    assert_eq!(
        targets,
        vec![
            "/orders",
            "/orders?status=done&product_id=ETH-USD",
            "/orders/ord-1",
            "/orders/client:my-oid",
        ]
    );
    for request in &requests {
        assert_signature_matches(request);
    }
}

#[tokio::test]
async fn test_place_order_body() {
    let server = TestServer::fixed(200, r#"{"id":"ord-9","status":"pending"}"#).await;
    let client = server.client();

    let order = NewOrder::limit(Side::Buy, "BTC-USD", dec!(100.00), dec!(0.01))
        .with_time_in_force(TimeInForce::ImmediateOrCancel)
        .with_client_oid("oid-9");

    let result = client.orders().place(&order).await.unwrap();
    assert_eq!(result["status"], "pending");

    let request = server.single_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.target, "/orders");
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&request.body).unwrap(),
        json!({
            "type": "limit",
            "side": "buy",
            "product_id": "BTC-USD",
            "price": "100.00",
            "size": "0.01",
            "time_in_force": "IOC",
            "client_oid": "oid-9"
        })
    );
    assert_signature_matches(&request);
}

#[tokio::test]
async fn test_cancel_paths() {
    let server = TestServer::fixed(200, r#"["ord-1"]"#).await;
    let client = server.client();
    let orders = client.orders();

    orders.cancel("ord-1").await.unwrap();
    orders.cancel_all(None).await.unwrap();
    orders.cancel_all(Some("BTC-USD")).await.unwrap();

    let requests = server.requests();
    let targets: Vec<&str> = requests.iter().map(|r| r.target.as_str()).collect();
    assert_eq!(
        targets,
        vec!["/orders/ord-1", "/orders", "/orders?product_id=BTC-USD"]
    );
    for request in &requests {
        assert_eq!(request.method, "DELETE");
        assert!(request.body_text().is_none());
        assert_signature_matches(request);
    }
}
