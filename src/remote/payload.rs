// Remote payload decoding.
// Turns whatever shape an endpoint returns into the canonical tab result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TileError};

/// One row of tab data, normally an object keyed by column.
pub type Record = Value;

/// Normalized result of a tab fetch. Always well formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalResult {
    pub items: Vec<Record>,
    /// Never empty.
    pub last_updated: String,
    pub total_count: u64,
}

impl CanonicalResult {
    /// Empty result stamped with the current time.
    pub fn empty() -> Self {
        Self::from_items(Vec::new())
    }

    /// Wrap items with the current time and their count.
    pub fn from_items(items: Vec<Record>) -> Self {
        Self {
            total_count: items.len() as u64,
            items,
            last_updated: now_stamp(),
        }
    }
}

/// Current local wall-clock time as HH:MM:SS.
pub fn now_stamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Shape of an object response carrying a list field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    data: Option<Value>,
    items: Option<Value>,
    last_updated: Option<Value>,
    total_count: Option<Value>,
}

/// Decoded remote payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// null or absent body.
    Empty,
    /// Object with a `data` or `items` list.
    Envelope {
        items: Vec<Record>,
        last_updated: Option<String>,
        total_count: Option<u64>,
    },
    /// Bare array.
    List(Vec<Record>),
    /// Any other value, treated as a single record.
    Single(Record),
}

impl Payload {
    /// Classify a JSON value. Fails only for envelopes whose list field is not a list.
    pub fn decode(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Payload::Empty),
            Value::Array(items) => Ok(Payload::List(items)),
            Value::Object(map) if map.contains_key("data") || map.contains_key("items") => {
                let envelope: Envelope = serde_json::from_value(Value::Object(map))?;
                Self::from_envelope(envelope)
            }
            other => Ok(Payload::Single(other)),
        }
    }

    fn from_envelope(envelope: Envelope) -> Result<Self> {
        let items = match envelope.data.or(envelope.items) {
            None => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(TileError::Malformed(format!(
                    "list field is {}, expected an array",
                    kind(&other)
                )));
            }
        };

        let last_updated = match envelope.last_updated {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            Some(Value::String(_)) | Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };

        Ok(Payload::Envelope {
            items,
            last_updated,
            total_count: envelope.total_count.and_then(|v| v.as_u64()),
        })
    }

    /// Convert into the canonical result, filling in missing metadata.
    pub fn into_canonical(self) -> CanonicalResult {
        match self {
            Payload::Empty => CanonicalResult::empty(),
            Payload::List(items) => CanonicalResult::from_items(items),
            Payload::Single(record) => CanonicalResult::from_items(vec![record]),
            Payload::Envelope {
                items,
                last_updated,
                total_count,
            } => CanonicalResult {
                total_count: total_count.unwrap_or(items.len() as u64),
                items,
                last_updated: last_updated.unwrap_or_else(now_stamp),
            },
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
