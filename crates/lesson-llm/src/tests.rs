/// Wire-format tests for the request/response types, checked against the
/// payload shapes the chat-completion API documents.
#[cfg(test)]
mod unit {
    use serde_json::json;

    use crate::types::{ChatMessage, ChatRequest, ChatResponse, ResponseFormat, Role};
    use crate::{ChatModel, LlmError, ScriptedModel};

    fn request(format: ResponseFormat) -> ChatRequest {
        ChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![ChatMessage::system("ルール"), ChatMessage::user("依頼")],
            temperature: 0.3,
            max_tokens: 6000,
            response_format: format,
        }
    }

    #[test]
    fn strict_schema_format_serializes_with_nested_schema() {
        let format = ResponseFormat::strict_schema("lesson_plan", json!({"type": "object"}));
        let value = serde_json::to_value(request(format)).unwrap();
        assert_eq!(value["response_format"]["type"], "json_schema");
        assert_eq!(value["response_format"]["json_schema"]["name"], "lesson_plan");
        assert_eq!(value["response_format"]["json_schema"]["strict"], true);
        assert_eq!(
            value["response_format"]["json_schema"]["schema"]["type"],
            "object"
        );
    }

    #[test]
    fn json_object_format_serializes_as_bare_type() {
        let value = serde_json::to_value(request(ResponseFormat::JsonObject)).unwrap();
        assert_eq!(value["response_format"], json!({"type": "json_object"}));
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["max_tokens"], 6000);
    }

    #[test]
    fn request_message_finds_by_role() {
        let req = request(ResponseFormat::JsonObject);
        assert_eq!(req.message(Role::System), Some("ルール"));
        assert_eq!(req.message(Role::User), Some("依頼"));
        assert_eq!(req.message(Role::Assistant), None);
    }

    #[test]
    fn response_refusal_becomes_error() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": null, "refusal": "I can't help with that."}}]
        }))
        .unwrap();
        let err = resp.into_text().unwrap_err();
        assert!(matches!(err, LlmError::Refused(ref r) if r.contains("can't")));
    }

    #[test]
    fn response_reads_served_model_and_usage() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "model": "gpt-4o-mini-2024-07-18",
            "choices": [{"message": {"content": "{}"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 4, "total_tokens": 14}
        }))
        .unwrap();
        assert_eq!(resp.model.as_deref(), Some("gpt-4o-mini-2024-07-18"));
        assert_eq!(resp.usage.unwrap().total_tokens, 14);
    }

    #[test]
    fn blank_content_is_empty() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "  "}}]
        }))
        .unwrap();
        assert!(matches!(resp.into_text(), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn response_without_choices_is_empty() {
        let resp: ChatResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(matches!(resp.into_text(), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn truncated_response_still_returns_text() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "{\"a\":"}, "finish_reason": "length"}]
        }))
        .unwrap();
        assert_eq!(resp.into_text().unwrap(), "{\"a\":");
    }

    #[tokio::test]
    async fn scripted_model_replays_in_order_and_records() {
        let model = ScriptedModel::with_texts(["one", "two"]);
        let req = request(ResponseFormat::JsonObject);
        assert_eq!(model.complete(&req).await.unwrap(), "one");
        assert_eq!(model.complete(&req).await.unwrap(), "two");
        assert!(model.complete(&req).await.is_err());
        assert_eq!(model.call_count(), 3);
        assert_eq!(model.requests()[0], req);
    }
}
