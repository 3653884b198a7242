use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::recipe::parse_timestamp;

/// When a recipe was last cooked.
///
/// Both timestamps are set together by every "mark as cooked" action.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CookLogEntry {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub last_cooked: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub last_marked_as_cooked: Option<DateTime<Utc>>,
}

impl CookLogEntry {
    pub fn mark(&mut self, at: DateTime<Utc>) {
        self.last_cooked = Some(at);
        self.last_marked_as_cooked = Some(at);
    }

    pub fn is_cooked(&self) -> bool {
        self.last_cooked.is_some()
    }
}

/// Accepts anything [`parse_timestamp`] does; other values read as never cooked.
fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = value.as_str().and_then(parse_timestamp);
    if parsed.is_none() && !value.is_null() {
        tracing::warn!("Ignoring unreadable cook timestamp {}", value);
    }
    Ok(parsed)
}
