//! Relay server binary.

use std::net::SocketAddr;

use chatrelay::config::RelayConfig;
use chatrelay::relay;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = RelayConfig::from_env();
    let app = relay::app(&config)?;

    let addr: SocketAddr = std::env::var("CHATRELAY_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
        .parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "chatrelayd listening");
    axum::serve(listener, app).await?;
    Ok(())
}
