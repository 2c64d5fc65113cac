mod api;
mod middleware;

use std::sync::Arc;

use storefinder_agent::{BrowserAgentClient, FinderSettings, StoreFinder};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = storefinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if !config.has_agent_credential() {
        tracing::warn!(
            "STOREFINDER_AGENT_API_KEY not set; store searches will fail until it is configured"
        );
    }

    let agent = BrowserAgentClient::from_config(&config)?;
    let finder = StoreFinder::new(FinderSettings::from_config(&config), Arc::new(agent));
    let app = build_app(AppState { finder });

    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        model = %config.agent_model,
        "starting store finder service"
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
