use std::sync::Arc;

use diet_form_server::middleware::LoggingMiddleware;
use diet_form_server::startup::{bind_address, http_timeout, log_filter};
use diet_form_server::{AppState, router};
use diet_plan_client::DietPlanClient;
use diet_plan_client::config::Config;
use diet_plan_client::http_client::ReqwestDietPlanClient;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::signal;
use tracing::info;

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn init_logging() {
    let env_filter = log_filter(env_var);
    let filter = env_filter.to_string();
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    info!(%filter, "diet_form_server: log filter");
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_logging();

    let handle = PrometheusBuilder::new().install_recorder()?;

    let cfg = Config::from_env()?;
    info!(api_base_url = %cfg.api_base_url, timeout = ?cfg.request_timeout, "diet backend configured");

    let client: Arc<dyn DietPlanClient> = Arc::new(LoggingMiddleware::new(
        ReqwestDietPlanClient::from_config(&cfg)?,
    ));
    let state = Arc::new(AppState::new(client, Some(handle)));
    let app = router(state, http_timeout(cfg.request_timeout));

    let addr = bind_address(env_var);
    info!(%addr, "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind to address {addr}: {e}");
        e
    })?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("failed to listen for ctrl+c: {e}");
            }
        })
        .await?;

    info!("server stopped");
    Ok(())
}
