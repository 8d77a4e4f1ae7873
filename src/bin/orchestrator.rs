use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dagcalc::config::OrchestratorConfig;
use dagcalc::engine::Scheduler;
use dagcalc::server;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = OrchestratorConfig::from_env();
    info!(
        port = config.port,
        add_ms = config.operation_times.addition,
        sub_ms = config.operation_times.subtraction,
        mul_ms = config.operation_times.multiplication,
        div_ms = config.operation_times.division,
        "starting orchestrator"
    );

    let scheduler = Arc::new(Scheduler::new(config.operation_times.clone()));

    if let Err(err) = server::serve(config.port, scheduler).await {
        error!(error = %err, "server failed");
        std::process::exit(1);
    }
}
