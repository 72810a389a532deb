use axum::Json;
use serde_json::{json, Value};

/// GET /api/health - 健康检查
///
/// Liveness only, touches no storage.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "build_time": env!("BUILD_TIME"),
    }))
}
