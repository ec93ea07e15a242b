/*
 * Responsibility
 * - GET /health (liveness; sits outside the auth middleware)
 */
use axum::{Json, extract::State};
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: state.service_name.to_string(),
        timestamp: Utc::now().timestamp_millis(),
    })
}
