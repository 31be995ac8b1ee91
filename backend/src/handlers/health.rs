use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "moodlog-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn data_dir_writable(state: &AppState) -> bool {
    let dir = state.journal.root();
    if tokio::fs::create_dir_all(dir).await.is_err() {
        return false;
    }
    let marker = dir.join(".readyz");
    let ok = tokio::fs::write(&marker, b"ok").await.is_ok();
    let _ = tokio::fs::remove_file(&marker).await;
    ok
}

pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if data_dir_writable(&state).await {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "checks": { "storage": "ok" },
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "checks": { "storage": "failed" },
            })),
        )
    }
}
