//! Documentation of the SMO (Sistema de Manifesto Operacional) agent.
//!
//! Operational tracking of air-cargo manifests through a fixed lifecycle
//! (Recebido → Iniciado → Disponível → Em Conferência → Pendente →
//! Completo → Entregue/Cancelado/Anulado).
//!
//!
//!
//! # General Infrastructure
//! - All durable state lives in the remote relational backend; this process
//!   never writes to it directly
//! - Mutations go through the workflow webhooks which validate and write
//!   server-side; one endpoint per action family, cancel/annul/deliver share
//!   one keyed by the `Action` field
//! - The agent keeps an optimistic in-memory snapshot refreshed every
//!   second while a session is open and serves it to the dashboard frontend
//! - Identifier sequences are derived client-side from an authoritative
//!   sample, with a cache fallback when the backend read fails; the save
//!   webhook remains the final authority on what gets persisted
//!
//!
//!
//! # Sessions
//!
//! **Goal**: at most one active session per user, without server push.
//!
//! - The login webhook issues the session token and overwrites the stored
//!   one, superseding any other copy of the dashboard
//! - The frontend probes `/session/probe` on focus, click and visibility
//!   changes; every write re-checks before posting
//! - A mismatch between the held token and the stored one forces a local
//!   logout; the operator must authenticate again
//! - Detection lag is bounded by interaction frequency, which is accepted
//!
//!
//!
//! # Notes
//!
//! ## Polling
//! Poll responses replace the snapshot wholesale. Overlapping responses are
//! tolerated: whichever is processed last wins, and a failed tick just
//! leaves the previous snapshot in place until the next one. Eventual
//! consistency is acceptable here; the backend is the source of truth and
//! every screen refreshes within a second.
//!
//! ## Turnos
//! Shift windows are fixed wall-clock ranges (06:00–13:59, 14:00–21:59,
//! 22:00–05:59) and derive from the received timestamp at render time;
//! they are never persisted.

use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod actions;
pub mod config;
pub mod error;
pub mod manifest;
pub mod metrics;
pub mod poller;
pub mod routes;
pub mod sequence;
pub mod session;
pub mod shift;
pub mod state;
pub mod utils;

use config::Config;
use routes::{
    edit_handler, history_handler, login_handler, logout_handler, manifests_handler,
    next_id_handler, probe_handler, save_handler, status_handler,
};
use state::State;

pub async fn start() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new(Config::load());

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/manifests", get(manifests_handler).post(save_handler))
        .route("/manifests/edit", post(edit_handler))
        .route("/manifests/status", post(status_handler))
        .route("/manifests/{id}/history", get(history_handler))
        .route("/next-id", get(next_id_handler))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/session/probe", post(probe_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    state.clear_session();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
