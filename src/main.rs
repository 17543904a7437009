use anyhow::{Context, Result};
use tracing::info;
use weekly_report::{app_state::AppState, config::Config, routes::router, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    // A missing API key stops us here, before anything is served.
    let config = Config::from_env()?;
    info!(?config, "configuration loaded");

    let state = AppState::from_config(&config)?;
    let gate = state.gate_enabled();

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("binding {}", config.bind_addr()))?;
    info!(addr = %config.bind_addr(), password_gate = gate, "listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
