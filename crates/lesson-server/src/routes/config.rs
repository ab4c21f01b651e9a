use axum::extract::State;
use axum::Json;

use crate::state::AppState;

/// GET /api/health — liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

/// GET /api/config — active model settings. The API key is never included.
pub async fn get_config(State(app): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "model": app.settings.model,
        "temperature": app.settings.temperature,
        "max_tokens": app.settings.max_tokens,
        "repair_temperature": app.settings.repair_temperature(),
        "repair_max_tokens": app.settings.repair_max_tokens(),
    }))
}
