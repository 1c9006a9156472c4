use std::net::SocketAddr;

use relay::{build_router, RelayState, WebhookEndpoint, WebhookNotifier};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let endpoint = WebhookEndpoint::resolve(settings.webhook_url.as_deref());
    let notifier = WebhookNotifier::new(endpoint, settings.webhook_timeout())?;
    let app = build_router(RelayState::new(notifier));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, timeout_secs = settings.webhook_timeout_secs, "contact relay listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
