use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use lesson_core::{Generation, Planner};

use crate::error::AppError;
use crate::state::AppState;

pub const HEADER_MODEL_USED: HeaderName = HeaderName::from_static("x-model-used");
pub const HEADER_REQUESTED_HOURS: HeaderName = HeaderName::from_static("x-requested-hours");
pub const HEADER_TARGET_HOURS: HeaderName = HeaderName::from_static("x-target-hours");
pub const HEADER_REPAIR_STATUS: HeaderName = HeaderName::from_static("x-repair-status");
pub const HEADER_FALLBACK_USED: HeaderName = HeaderName::from_static("x-fallback-used");

/// POST /api/lesson-plans/generate — generate a lesson plan from `{ "prompt": "…" }`.
///
/// The body is read as loose JSON so that a missing or non-string `prompt`
/// is a 400 with a JSON error, not an extractor rejection.
pub async fn generate_lesson_plan(
    State(app): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body.map_err(|e| AppError::bad_request(e.body_text()))?;
    let prompt = match body.get("prompt") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(_) => return Err(AppError::bad_request("prompt must be a string")),
        None => return Err(AppError::bad_request("prompt is required")),
    };

    let generation = Planner::new(app.model.as_ref(), &app.settings)
        .generate(&prompt)
        .await?;

    let headers = diagnostic_headers(&generation);
    Ok((headers, Json(generation.plan)).into_response())
}

fn diagnostic_headers(g: &Generation) -> HeaderMap {
    let mut headers = HeaderMap::new();
    // Model names are ASCII in practice; skip the header rather than fail if not.
    if let Ok(v) = HeaderValue::from_str(&g.model) {
        headers.insert(HEADER_MODEL_USED, v);
    }
    let requested = g.requested_hours.map(|n| n.to_string()).unwrap_or_default();
    if let Ok(v) = HeaderValue::from_str(&requested) {
        headers.insert(HEADER_REQUESTED_HOURS, v);
    }
    headers.insert(HEADER_TARGET_HOURS, HeaderValue::from(g.target_hours));
    headers.insert(
        HEADER_REPAIR_STATUS,
        HeaderValue::from_static(g.repair.as_str()),
    );
    headers.insert(
        HEADER_FALLBACK_USED,
        HeaderValue::from_static(if g.used_fallback { "true" } else { "false" }),
    );
    headers
}
