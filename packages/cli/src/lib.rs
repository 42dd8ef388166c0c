// ABOUTME: GiveLink server library
// ABOUTME: Configuration, middleware and the serve/migrate entry points used by the binary

pub mod api;
pub mod config;
pub mod middleware;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use givelink_api::{AppState, AuthSettings};

pub use config::{Config, ConfigError};

/// Open the database, build the router and serve until a shutdown signal arrives.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let jwt_secret = config.require_jwt_secret()?.to_string();
    if config.admin_token.is_none() {
        warn!("No admin token configured, admin endpoints are disabled");
    }

    let pool = givelink_storage::connect(&config.database_path).await?;
    let state = AppState::new(
        pool.clone(),
        AuthSettings {
            jwt_secret,
            admin_token: config.admin_token.clone(),
            secure_cookies: config.secure_cookies,
        },
    );
    let app = api::create_router(state, &config)?;

    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr).await?;
    info!("GiveLink listening on http://{}", addr);
    info!("CORS origin: {}", config.cors_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

/// Apply pending migrations and exit.
pub async fn run_migrations(config: &Config) -> anyhow::Result<()> {
    let pool = givelink_storage::connect(&config.database_path).await?;
    info!(
        "Database at {} is up to date",
        config.database_path.display()
    );
    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
