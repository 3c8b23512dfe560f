//! Log record structure and message normalization

use super::caller::CallerInfo;
use super::format::{flatten_args, sprintf, Arg};
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// What a caller hands to a leveled logging call.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageInput {
    /// printf-style template
    Format(String),
    /// Description of an error, used as a template
    Error(String),
    /// Structured value passed through untouched
    Value(Value),
    /// A value whose serialization failed, with its debug description
    Opaque(String),
}

impl MessageInput {
    pub fn error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        MessageInput::Error(err.to_string())
    }

    /// Convert any serializable value into a structured input.
    ///
    /// Strings still count as templates. A serialization failure is kept as
    /// [`MessageInput::Opaque`]: plain text shows the debug form, JSON output
    /// drops the record.
    pub fn value<T: Serialize + fmt::Debug + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(Value::String(template)) => MessageInput::Format(template),
            Ok(value) => MessageInput::Value(value),
            Err(_) => MessageInput::Opaque(format!("{:?}", value)),
        }
    }
}

impl From<&str> for MessageInput {
    fn from(s: &str) -> Self {
        MessageInput::Format(s.to_string())
    }
}

impl From<String> for MessageInput {
    fn from(s: String) -> Self {
        MessageInput::Format(s)
    }
}

impl From<&String> for MessageInput {
    fn from(s: &String) -> Self {
        MessageInput::Format(s.clone())
    }
}

impl From<Value> for MessageInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(template) => MessageInput::Format(template),
            other => MessageInput::Value(other),
        }
    }
}

impl From<Map<String, Value>> for MessageInput {
    fn from(map: Map<String, Value>) -> Self {
        MessageInput::Value(Value::Object(map))
    }
}

impl From<&std::io::Error> for MessageInput {
    fn from(err: &std::io::Error) -> Self {
        MessageInput::error(err)
    }
}

impl From<std::io::Error> for MessageInput {
    fn from(err: std::io::Error) -> Self {
        MessageInput::error(&err)
    }
}

impl From<&super::error::LoggerError> for MessageInput {
    fn from(err: &super::error::LoggerError) -> Self {
        MessageInput::error(err)
    }
}

impl From<super::error::LoggerError> for MessageInput {
    fn from(err: super::error::LoggerError) -> Self {
        MessageInput::error(&err)
    }
}

/// Message body of a record, decided once when the record is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    /// String-keyed mapping; flattened into the top level of JSON output
    Fields(Map<String, Value>),
    Value(Value),
    Opaque(String),
}

impl Payload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text as-is, structured payloads as compact JSON.
    pub fn to_plain(&self) -> String {
        match self {
            Payload::Text(s) | Payload::Opaque(s) => s.clone(),
            Payload::Fields(map) => Value::Object(map.clone()).to_string(),
            Payload::Value(value) => value.to_string(),
        }
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Payload::Text(s) | Payload::Opaque(s) => serializer.serialize_str(s),
            Payload::Fields(map) => map.serialize(serializer),
            Payload::Value(value) => value.serialize(serializer),
        }
    }
}

/// One logging call, normalized.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub id: String,
    pub level: LogLevel,
    pub level_name: &'static str,
    pub timestamp: DateTime<Local>,
    #[serde(flatten)]
    pub caller: CallerInfo,
    #[serde(rename = "message")]
    pub payload: Payload,
}

impl LogRecord {
    /// Build a record from raw input.
    ///
    /// Templates (plain or taken from an error) get `args` substituted after
    /// unpacking a lone list argument; structured values pass through.
    pub fn build(level: LogLevel, caller: CallerInfo, input: MessageInput, args: &[Arg]) -> Self {
        let payload = match input {
            MessageInput::Format(template) | MessageInput::Error(template) => {
                Payload::Text(sprintf(&template, &flatten_args(args)))
            }
            MessageInput::Value(Value::Object(map)) => Payload::Fields(map),
            MessageInput::Value(value) => Payload::Value(value),
            MessageInput::Opaque(description) => Payload::Opaque(description),
        };
        Self::with_payload(level, caller, payload)
    }

    pub fn with_payload(level: LogLevel, caller: CallerInfo, payload: Payload) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            level,
            level_name: level.name(),
            timestamp: Local::now(),
            caller,
            payload,
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
