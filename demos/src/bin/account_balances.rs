//! Demo 1: Account Balances
//!
//! Showcases: signed GET requests, concurrent calls, error classification
//!
//! Run: COINBASE_SANDBOX=1 cargo run --bin account_balances
//!
//! Requires COINBASE_API_KEY, COINBASE_API_SECRET and COINBASE_API_PASSPHRASE.

use coinbase_rest::{CoinbaseRestClient, Pagination, RestError};
use futures::future::join_all;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let client = CoinbaseRestClient::from_env()?;
    println!("=== Coinbase accounts ({}) ===\n", client.environment());

    let accounts = match client.accounts().list().await {
        Ok(accounts) => accounts,
        Err(RestError::Api(e)) => {
            eprintln!("Rejected by exchange: {} [{}]", e.message, e.kind);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let ids: Vec<String> = accounts
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|a| a["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    for account in accounts.as_array().into_iter().flatten() {
        println!(
            "  {:<6} balance {:>20} available {:>20}",
            account["currency"].as_str().unwrap_or("?"),
            account["balance"].as_str().unwrap_or("-"),
            account["available"].as_str().unwrap_or("-"),
        );
    }

    // Fetch the latest ledger entry of every account concurrently
    let page = Pagination::new().limit(1);
    let ledgers = join_all(ids.iter().map(|id| {
        let accounts = client.accounts();
        let page = page.clone();
        async move { (id, accounts.ledger(id, &page).await) }
    }))
    .await;

    println!("\n--- Latest ledger entries ---\n");
    for (id, ledger) in ledgers {
        match ledger {
            Ok(entries) => println!("  {} {}", id, entries),
            Err(e) => println!("  {} failed: {}", id, e),
        }
    }

    Ok(())
}
