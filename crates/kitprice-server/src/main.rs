use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use kitprice_platform::ServiceConfig;
use kitprice_server::{AppState, router};
use kitprice_store::InMemoryWorksheetStore;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "kitprice_server=info".to_string()),
        )
        .init();

    let config = ServiceConfig::from_env("0.0.0.0:8095")?;
    let store = Arc::new(InMemoryWorksheetStore::new(config.max_worksheets));
    let state = AppState::new(store, &config);

    let addr: SocketAddr = config
        .http_addr
        .parse()
        .with_context(|| format!("HTTP_ADDR {:?} is not a socket address", config.http_addr))?;
    info!(
        default_rows = config.default_rows,
        max_rows = config.max_rows,
        max_worksheets = config.max_worksheets,
        "kit price service listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
