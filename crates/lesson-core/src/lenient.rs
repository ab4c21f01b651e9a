//! Coercions from the loosely typed JSON a model emits into the shapes the
//! lesson-plan document stores. Each value is coerced once, when the document
//! is built; nothing downstream re-checks types. Values that cannot be
//! coerced are carried verbatim in [`Lenient::Raw`] so they still round-trip.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Largest hour count accepted from either the prompt or the model.
pub const MAX_HOURS: u32 = 99;

/// Replace full-width digits (`０`–`９`) with their ASCII forms.
pub fn fold_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Text from a scalar, or a list of scalars joined by newlines.
///
/// `null` and objects carry no usable text.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("\n"))
            }
        }
        Value::Null | Value::Object(_) => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A string or a list of strings, always read as a list. Blank items are dropped.
pub fn string_list(value: &Value) -> Vec<String> {
    let items: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    };
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// A positive hour count from a number (`5`, `5.0`) or a string that starts
/// with digits (`"5"`, `"5時間"`, `"５"`). Zero and counts above
/// [`MAX_HOURS`] read as absent.
pub fn hour_count(value: &Value) -> Option<u32> {
    let raw = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => {
            let folded = fold_digits(s.trim());
            let digits: String = folded.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u64>().ok()
        }
        _ => None,
    }?;
    u32::try_from(raw)
        .ok()
        .filter(|n| (1..=MAX_HOURS).contains(n))
}

pub fn de_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(&Value::deserialize(deserializer)?))
}

pub fn de_hours<'de, D>(deserializer: D) -> Result<Option<Lenient<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(Lenient::read_with(
        Value::deserialize(deserializer)?,
        hour_count,
    )))
}

// ---------------------------------------------------------------------------
// Lenient
// ---------------------------------------------------------------------------

/// A document field that was either read into its typed form or kept as the
/// model emitted it.
#[derive(Debug, Clone, PartialEq)]
pub enum Lenient<T> {
    Read(T),
    Raw(Value),
}

impl<T> Lenient<T> {
    /// `Read` when `read` understands `value`, `Raw(value)` otherwise.
    pub fn read_with(value: Value, read: impl FnOnce(&Value) -> Option<T>) -> Self {
        match read(&value) {
            Some(t) => Lenient::Read(t),
            None => Lenient::Raw(value),
        }
    }

    pub fn read(&self) -> Option<&T> {
        match self {
            Lenient::Read(t) => Some(t),
            Lenient::Raw(_) => None,
        }
    }
}

impl<T: Serialize> Serialize for Lenient<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Lenient::Read(t) => t.serialize(serializer),
            Lenient::Raw(v) => v.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fold_digits_converts_full_width() {
        assert_eq!(fold_digits("【授業時間数】１２"), "【授業時間数】12");
        assert_eq!(fold_digits("abc"), "abc");
    }

    #[test]
    fn text_accepts_scalars_and_lists() {
        assert_eq!(text(&json!("国語")), Some("国語".into()));
        assert_eq!(text(&json!(3)), Some("3".into()));
        assert_eq!(text(&json!(["a", "b"])), Some("a\nb".into()));
        assert_eq!(text(&json!(null)), None);
        assert_eq!(text(&json!({"x": 1})), None);
    }

    #[test]
    fn string_list_coerces_single_string() {
        assert_eq!(string_list(&json!("音読している")), vec!["音読している"]);
        assert_eq!(string_list(&json!(["a", " ", "b"])), vec!["a", "b"]);
        assert!(string_list(&json!(null)).is_empty());
    }

    #[test]
    fn hour_count_reads_numbers_and_digit_prefixes() {
        assert_eq!(hour_count(&json!(5)), Some(5));
        assert_eq!(hour_count(&json!(8.0)), Some(8));
        assert_eq!(hour_count(&json!("6時間")), Some(6));
        assert_eq!(hour_count(&json!("１０")), Some(10));
        assert_eq!(hour_count(&json!(0)), None);
        assert_eq!(hour_count(&json!(100)), None);
        assert_eq!(hour_count(&json!(2.5)), None);
        assert_eq!(hour_count(&json!("たくさん")), None);
    }

    #[test]
    fn lenient_keeps_unreadable_value_verbatim() {
        let kept = Lenient::read_with(json!("未定"), hour_count);
        assert_eq!(kept, Lenient::Raw(json!("未定")));
        assert_eq!(kept.read(), None);
        assert_eq!(serde_json::to_value(&kept).unwrap(), json!("未定"));

        let read = Lenient::read_with(json!("4時間"), hour_count);
        assert_eq!(read.read(), Some(&4));
        assert_eq!(serde_json::to_value(&read).unwrap(), json!(4));
    }
}
