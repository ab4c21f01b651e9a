use serde_json::{json, Map, Value};

use crate::flow::hour_key;
use crate::lenient::MAX_HOURS;
use crate::plan::keys;

pub const SCHEMA_NAME: &str = "lesson_plan";

/// JSON schema sent with the schema-constrained primary call.
///
/// Strict mode wants every object closed and every property required, so the
/// shape of `授業の流れ` depends on what the prompt said. With a known hour
/// count it is an object keyed `1時間目..N時間目`; otherwise it is an array of
/// session texts, which [`LessonFlow::from_value`](crate::LessonFlow::from_value)
/// reads back into the keyed form.
pub fn lesson_plan_schema(hours: Option<u32>) -> Value {
    let string_list = json!({ "type": "array", "items": { "type": "string" } });

    let mut properties = Map::new();
    for key in [keys::TEXTBOOK, keys::GENRE, keys::MATERIAL, keys::UNIT_NAME] {
        properties.insert(key.into(), json!({ "type": "string" }));
    }
    properties.insert(
        keys::GRADE.into(),
        json!({ "type": "string", "enum": keys::GRADES }),
    );
    properties.insert(
        keys::HOURS.into(),
        json!({ "type": "integer", "description": "1以上の整数" }),
    );
    properties.insert(
        keys::UNIT_GOAL.into(),
        json!({ "type": "string", "description": "1〜3文" }),
    );
    properties.insert(
        keys::EVALUATION.into(),
        closed_object(Map::from_iter([
            (keys::EVAL_KNOWLEDGE.to_string(), string_list.clone()),
            (keys::EVAL_THINKING.to_string(), string_list.clone()),
            (keys::EVAL_ATTITUDE.to_string(), string_list),
        ])),
    );
    properties.insert(keys::DISPOSITION.into(), json!({ "type": "string" }));
    properties.insert(keys::FLOW.into(), flow_schema(hours));
    properties.insert(keys::LANGUAGE_ACTIVITIES.into(), json!({ "type": "string" }));
    properties.insert(keys::RESULT.into(), json!({ "type": "string" }));

    closed_object(properties)
}

fn flow_schema(hours: Option<u32>) -> Value {
    let session = json!({ "type": "string", "description": "その時間の授業展開を述べた文章" });
    match hours.filter(|n| (1..=MAX_HOURS).contains(n)) {
        Some(n) => {
            let mut schema =
                closed_object((1..=n).map(|i| (hour_key(i), session.clone())).collect());
            schema["description"] = json!(format!("「1時間目」から「{n}時間目」まで"));
            schema
        }
        None => json!({
            "type": "array",
            "description": "要素1つが1時間分。先頭から順に1時間目、2時間目…。要素数は授業時間数と同じ。",
            "items": session,
        }),
    }
}

/// An object with every property required and nothing else allowed.
fn closed_object(properties: Map<String, Value>) -> Value {
    let required: Vec<&str> = properties.keys().map(String::as_str).collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}
