use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Key of the flow slot for the `n`th teaching session, e.g. `3時間目`.
pub fn hour_key(n: u32) -> String {
    format!("{n}時間目")
}

// ---------------------------------------------------------------------------
// FlowEntry
// ---------------------------------------------------------------------------

/// One value of the `授業の流れ` object.
///
/// Models usually emit prose, but bullet arrays and nested objects show up
/// too. Those are kept as `Structured` until the flow is rebuilt for a known
/// hour count, at which point they count as unfilled.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEntry {
    Text(String),
    Structured(Value),
}

impl FlowEntry {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => FlowEntry::Text(s),
            other => FlowEntry::Structured(other),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FlowEntry::Text(s) => Some(s),
            FlowEntry::Structured(_) => None,
        }
    }

    /// Blank means "still needs narrative": whitespace-only text or anything
    /// that is not text at all.
    pub fn is_blank(&self) -> bool {
        self.as_text().map_or(true, |s| s.trim().is_empty())
    }
}

impl Serialize for FlowEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FlowEntry::Text(s) => serializer.serialize_str(s),
            FlowEntry::Structured(v) => v.serialize(serializer),
        }
    }
}

// ---------------------------------------------------------------------------
// LessonFlow
// ---------------------------------------------------------------------------

/// The ordered `授業の流れ` object.
///
/// Entry order is the order the model emitted until [`LessonFlow::ensure_hours`]
/// rebuilds it as `1時間目..N時間目`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LessonFlow {
    entries: Vec<(String, FlowEntry)>,
}

impl LessonFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a flow object, or an array of session texts keyed in order as
    /// `1時間目`, `2時間目`, …. Any other value yields an empty flow.
    pub fn from_value(value: &Value) -> Self {
        let entries = match value {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| (k.clone(), FlowEntry::from_value(v.clone())))
                .collect(),
            Value::Array(items) => (1..)
                .zip(items)
                .map(|(n, v)| (hour_key(n), FlowEntry::from_value(v.clone())))
                .collect(),
            _ => Vec::new(),
        };
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FlowEntry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FlowEntry::as_text)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Set `key` to `text`, replacing an existing entry in place or appending.
    pub fn insert_text(&mut self, key: &str, text: impl Into<String>) {
        let entry = FlowEntry::Text(text.into());
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = entry,
            None => self.entries.push((key.to_string(), entry)),
        }
    }

    /// Rebuild the flow so it holds exactly `1時間目..hours時間目`, in order.
    ///
    /// Non-empty text under one of those keys is kept. Missing keys and
    /// non-text values become `""` placeholders; keys outside the range are
    /// dropped.
    pub fn ensure_hours(&mut self, hours: u32) {
        let rebuilt = (1..=hours)
            .map(|n| {
                let key = hour_key(n);
                let text = match self.get(&key) {
                    Some(FlowEntry::Text(s)) if !s.is_empty() => s.clone(),
                    _ => String::new(),
                };
                (key, FlowEntry::Text(text))
            })
            .collect();
        self.entries = rebuilt;
    }

    /// Keys whose entry is still blank, in flow order.
    pub fn gaps(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, v)| v.is_blank())
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Splice repaired narrative into the listed gap keys only.
    ///
    /// A gap is filled only when `repaired` holds non-blank text for it.
    /// Entries outside `gaps` are never touched. Returns how many gaps were
    /// filled.
    pub fn merge_repaired(&mut self, repaired: &LessonFlow, gaps: &[String]) -> usize {
        let mut filled = 0;
        for key in gaps {
            if let Some(text) = repaired.text(key).filter(|t| !t.trim().is_empty()) {
                self.insert_text(key, text);
                filled += 1;
            }
        }
        filled
    }
}

impl Serialize for LessonFlow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LessonFlow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_value(&Value::deserialize(deserializer)?))
    }
}
