use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dagcalc::agent::{self, HttpCoordinator};
use dagcalc::config::AgentConfig;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AgentConfig::from_env();
    info!(
        orchestrator_url = %config.orchestrator_url,
        computing_power = config.computing_power,
        "starting agent"
    );

    let coordinator = Arc::new(HttpCoordinator::new(config.orchestrator_url.clone()));

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received ctrl-c, stopping workers");
        }
        signal_token.cancel();
    });

    agent::run(coordinator, config.computing_power, shutdown).await;
    info!("agent stopped");
}
