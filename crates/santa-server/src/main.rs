mod config;

use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use santa_api::AppStateInner;
use santa_api::session::SessionConfig;
use santa_db::Exchange;

use crate::config::{Config, RosterSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "santa=debug,santa_api=debug,santa_db=debug,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;
    if config.uses_dev_secret() {
        warn!("SANTA_SESSION_SECRET is unset; using the development placeholder");
    }

    let roster = match &config.roster {
        RosterSource::List(list) => {
            let roster = santa_db::roster::from_list(list);
            info!("Loaded {} participants from SANTA_PARTICIPANTS", roster.len());
            roster
        }
        RosterSource::File(path) => santa_db::roster::load(path)?,
    };

    let store = santa_db::open(&config.backend)?;
    let exchange = Exchange::new(roster, store, config.strategy);
    info!(
        "Exchange ready: {} participants, {} store, {} draw",
        exchange.roster().len(),
        config.backend.kind(),
        exchange.strategy()
    );

    let state = AppStateInner::new(
        exchange,
        SessionConfig::new(config.session_secret.clone(), i64::from(config.session_days)),
    );

    let app = santa_api::router(state).layer(TraceLayer::new_for_http());

    info!("Secret Santa listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    info!("Received Ctrl+C, shutting down...");
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
