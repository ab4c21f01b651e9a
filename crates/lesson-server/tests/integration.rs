use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use http_body_util::BodyExt;
use lesson_core::ModelSettings;
use lesson_llm::{LlmError, ScriptedModel};
use lesson_server::AppState;
use serde_json::json;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn settings() -> ModelSettings {
    ModelSettings {
        model: "test-model".into(),
        ..ModelSettings::default()
    }
}

fn app_with(model: Arc<ScriptedModel>) -> axum::Router {
    lesson_server::build_router(AppState::new(model, settings()))
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// POST a raw body to the generate endpoint and return (status, headers, parsed JSON body).
async fn post_generate(
    app: axum::Router,
    body: impl Into<axum::body::Body>,
) -> (StatusCode, HeaderMap, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/lesson-plans/generate")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, headers, json)
}

fn json_body(value: serde_json::Value) -> axum::body::Body {
    axum::body::Body::from(serde_json::to_vec(&value).unwrap())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_ok() {
    let (status, json) = get(app_with(Arc::new(ScriptedModel::default())), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
}

#[tokio::test]
async fn config_reports_model_settings() {
    let (status, json) = get(app_with(Arc::new(ScriptedModel::default())), "/api/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["model"], "test-model");
    assert_eq!(json["max_tokens"], 6000);
    assert!(json.get("api_key").is_none());
}

#[tokio::test]
async fn generate_overrides_hours_and_repairs_gaps() {
    let primary = json!({
        "教材名": "ありの行列",
        "授業時間数": 3,
        "授業の流れ": {"1時間目": "題名から内容を予想する。", "2時間目": ""}
    });
    let repair = json!({
        "授業の流れ": {
            "2時間目": "二", "3時間目": "三", "4時間目": "四", "5時間目": "五"
        }
    });
    let model = Arc::new(ScriptedModel::with_texts([
        primary.to_string(),
        repair.to_string(),
    ]));

    let (status, headers, json) = post_generate(
        app_with(model.clone()),
        json_body(json!({"prompt": "【授業時間数】5 単元名：ありの行列"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["授業時間数"], 5);
    assert_eq!(json["教材名"], "ありの行列");
    assert_eq!(json["単元名"], "ありの行列");
    let flow = json["授業の流れ"].as_object().unwrap();
    let keys: Vec<&str> = flow.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["1時間目", "2時間目", "3時間目", "4時間目", "5時間目"]);
    assert_eq!(flow["1時間目"], "題名から内容を予想する。");
    assert_eq!(flow["5時間目"], "五");

    assert_eq!(headers["x-model-used"], "test-model");
    assert_eq!(headers["x-requested-hours"], "5");
    assert_eq!(headers["x-target-hours"], "5");
    assert_eq!(headers["x-repair-status"], "filled");
    assert_eq!(headers["x-fallback-used"], "false");
    assert_eq!(model.call_count(), 2);
}

#[tokio::test]
async fn generate_without_hour_label_reports_empty_requested_hours() {
    let primary = json!({
        "授業時間数": 2,
        "授業の流れ": {"1時間目": "一", "2時間目": "二"}
    });
    let model = Arc::new(ScriptedModel::with_texts([primary.to_string()]));

    let (status, headers, json) =
        post_generate(app_with(model.clone()), json_body(json!({"prompt": "物語文"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["授業の流れ"]["2時間目"], "二");
    assert_eq!(headers["x-requested-hours"], "");
    assert_eq!(headers["x-target-hours"], "2");
    assert_eq!(headers["x-repair-status"], "not-needed");
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn generate_uses_fallback_when_primary_fails() {
    let fallback = json!({"授業時間数": 1, "授業の流れ": {"1時間目": "一"}});
    let model = Arc::new(ScriptedModel::new([
        Err(LlmError::Api {
            status: 400,
            body: "schema rejected".into(),
        }),
        Ok(fallback.to_string()),
    ]));

    let (status, headers, json) =
        post_generate(app_with(model), json_body(json!({"prompt": "説明文"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["授業の流れ"]["1時間目"], "一");
    assert_eq!(headers["x-fallback-used"], "true");
}

#[tokio::test]
async fn generate_returns_500_with_model_when_fallback_fails() {
    let model = Arc::new(ScriptedModel::new([
        Err(LlmError::Api {
            status: 400,
            body: "schema rejected".into(),
        }),
        Err(LlmError::Api {
            status: 401,
            body: "invalid api key".into(),
        }),
    ]));

    let (status, _, json) =
        post_generate(app_with(model), json_body(json!({"prompt": "説明文"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["modelUsed"], "test-model");
    assert!(json["error"].as_str().unwrap().contains("invalid api key"));
}

#[tokio::test]
async fn generate_answers_200_with_placeholders_when_completion_is_empty() {
    let model = Arc::new(ScriptedModel::new([
        Err(LlmError::EmptyResponse),
        Err(LlmError::EmptyResponse),
    ]));

    let (status, headers, json) = post_generate(
        app_with(model.clone()),
        json_body(json!({"prompt": "【授業時間数】3"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["授業時間数"], 3);
    assert_eq!(json["授業の流れ"], json!({"1時間目": "", "2時間目": "", "3時間目": ""}));
    assert_eq!(headers["x-fallback-used"], "false");
    assert_eq!(headers["x-repair-status"], "partial");
    assert_eq!(model.call_count(), 2);
}

#[tokio::test]
async fn generate_rejects_missing_prompt() {
    let model = Arc::new(ScriptedModel::default());
    let (status, _, json) = post_generate(app_with(model.clone()), json_body(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn generate_rejects_non_string_prompt() {
    let model = Arc::new(ScriptedModel::default());
    let (status, _, json) =
        post_generate(app_with(model.clone()), json_body(json!({"prompt": 42}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "prompt must be a string");
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn generate_rejects_blank_prompt() {
    let model = Arc::new(ScriptedModel::default());
    let (status, _, json) =
        post_generate(app_with(model.clone()), json_body(json!({"prompt": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "prompt is required");
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn generate_rejects_malformed_json_body() {
    let model = Arc::new(ScriptedModel::default());
    let (status, _, json) = post_generate(app_with(model), "{ not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}
