use axum::Json;
use serde_json::{json, Value};

/// Liveness text served at `/`. Never depends on the upstream API.
pub const LIVENESS_MESSAGE: &str = "🚑 MediBot backend is alive!";

pub async fn index() -> &'static str {
    LIVENESS_MESSAGE
}

/// Health check endpoint for container probes.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "medibot-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
