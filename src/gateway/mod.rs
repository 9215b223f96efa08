//! HTTP gateway: routing, shared state, and the wire envelope.

pub mod handlers;
pub mod response;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let wallet_routes = Router::new()
        .route(
            "/idempotency-key",
            post(handlers::wallet::issue_idempotency_key),
        )
        .route("/topup", post(handlers::wallet::top_up))
        .route("/bonus", post(handlers::wallet::bonus))
        .route("/purchase", post(handlers::wallet::purchase))
        .route("/balance/{user_id}", get(handlers::wallet::get_balance))
        .route(
            "/transactions",
            get(handlers::wallet::get_transaction_history),
        )
        .route(
            "/transactions/{id}",
            get(handlers::wallet::get_transaction_by_id),
        );

    let user_routes = Router::new()
        .route(
            "/",
            post(handlers::user::create_user).get(handlers::user::list_users),
        )
        .route("/{id}", get(handlers::user::get_user));

    Router::new()
        .route("/api/health", get(handlers::health::health_check))
        .nest("/api/wallet", wallet_routes)
        .nest("/api/users", user_routes)
        .with_state(state)
}

/// Serve until SIGINT/SIGTERM.
pub async fn run_server(config: &GatewayConfig, state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Gateway listening");

    let router = build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install SIGINT handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
