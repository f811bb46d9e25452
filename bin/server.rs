// Friend Ledger - Web Server
// JSON API over one in-memory ledger

use anyhow::{Context, Result};
use friend_ledger::api::{router, AppState};
use friend_ledger::{logging, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init_stderr(&config.log_filter)?;

    let state = AppState::new(config.new_store());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.server_addr)
        .await
        .with_context(|| format!("binding {}", config.server_addr))?;

    tracing::info!(addr = %config.server_addr, "server listening");
    println!("🚀 Server running on http://{}", config.server_addr);
    println!("   API: http://{}/api/state", config.server_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
