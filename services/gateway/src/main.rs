mod csv;
mod error;
mod handlers;
mod models;
mod router;
mod state;

use router::create_router;
use state::AppState;
use std::net::SocketAddr;
use stock_engine::SimulatorConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting stock simulator gateway");

    // Optional deterministic seed for reproducible runs
    let seed = std::env::var("STOCK_SEED")
        .ok()
        .and_then(|s| s.parse().ok());
    let state = AppState::new(SimulatorConfig {
        seed,
        ..SimulatorConfig::default()
    });

    // Create router
    let app = create_router(state);

    // Bind and serve
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
