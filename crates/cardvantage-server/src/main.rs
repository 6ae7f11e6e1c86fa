use cardvantage_server::api::app_router;
use cardvantage_server::config::ServerConfig;
use cardvantage_server::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    init_tracing();
    let state = build_state(&config);
    let router = app_router(state, &config);
    tracing::info!(model = %config.model, "Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
