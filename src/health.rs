use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{db::ConnectionState, state::AppState};

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServerStatus {
    pub status: &'static str,
    pub message: &'static str,
    pub database: ConnectionState,
}

/// Liveness only; never touches the database.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        message: "Server is running",
    })
}

pub async fn server_status(State(state): State<AppState>) -> Json<ServerStatus> {
    Json(ServerStatus {
        status: "ok",
        message: "Backend server is running",
        database: state.connection.state().await,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
