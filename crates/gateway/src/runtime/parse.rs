//! Recovery ladder for structured model output.
//!
//! Models are asked for bare JSON but routinely wrap it in prose or code
//! fences. Each caller tries, in order, the whole response and then the
//! outermost brace-delimited slice; anything else is the caller's fallback.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Which rung of the ladder produced the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseRung {
    Whole,
    BraceSlice,
}

/// Parse `raw` as `T`, first as a whole and then from the span between the
/// first `{` and the last `}`. Only JSON objects count as records.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Option<(T, ParseRung)> {
    if let Some(value) = parse_object(raw.trim()) {
        return Some((value, ParseRung::Whole));
    }
    brace_slice(raw)
        .and_then(parse_object)
        .map(|value| (value, ParseRung::BraceSlice))
}

fn parse_object<T: DeserializeOwned>(text: &str) -> Option<T> {
    match serde_json::from_str::<Value>(text).ok()? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

/// The span from the first `{` to the last `}` inclusive.
pub fn brace_slice(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

/// Deserialize a field that should be `T` but may arrive as anything.
///
/// A value of the wrong shape reads as absent instead of failing the
/// enclosing record.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// A list of strings where non-string entries are dropped.
pub fn lenient_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        Some(Value::String(s)) => Some(vec![s]),
        _ => None,
    })
}
