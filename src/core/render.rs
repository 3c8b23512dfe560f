//! Record renderers
//!
//! Both are pure functions of the record. They carry the same content: the
//! plain-text line shows the level code and caller line, the JSON object
//! the lowercase level name and `file:line`.

use super::record::{LogRecord, Payload};
use super::timestamp::TimestampFormat;
use colored::Colorize;
use serde_json::{Map, Value};

/// `[time][CODE][namespace][function][line] message`
///
/// With `color` the fields are styled per level; without it the line holds
/// no escape sequences at all.
pub fn render_plain(record: &LogRecord, namespace: &str, color: bool) -> String {
    let time = TimestampFormat::Clock.format(&record.timestamp);
    let code = record.level.code();
    let function = record.caller.short_function.as_str();
    let message = record.payload.to_plain();

    if !color {
        return format!(
            "[{}][{}][{}][{}][{}] {}",
            time, code, namespace, function, record.caller.line, message
        );
    }

    format!(
        "[{}][{}][{}][{}][{}] {}",
        time.magenta(),
        code.color(record.level.code_color()).bold(),
        namespace.bright_white(),
        function.bright_cyan(),
        record.caller.line,
        message.color(record.level.message_color()).bold()
    )
}

/// Flat JSON object for a record, or `None` when the payload cannot be
/// represented.
///
/// String-keyed mapping payloads are merged into the top level and win over
/// the fixed keys on collision.
pub fn render_json_value(record: &LogRecord) -> Option<Value> {
    let mut object = Map::new();
    object.insert("logid".to_string(), Value::String(record.id.clone()));
    object.insert(
        "level".to_string(),
        Value::String(record.level_name.to_lowercase()),
    );
    object.insert(
        "time".to_string(),
        Value::String(TimestampFormat::Iso8601Offset.format(&record.timestamp)),
    );
    object.insert(
        "caller".to_string(),
        Value::String(format!("{}:{}", record.caller.file, record.caller.line)),
    );

    match &record.payload {
        Payload::Text(text) => {
            object.insert("message".to_string(), Value::String(text.clone()));
        }
        Payload::Fields(fields) => {
            for (key, value) in fields {
                object.insert(key.clone(), value.clone());
            }
        }
        Payload::Value(value) => {
            object.insert("message".to_string(), value.clone());
        }
        Payload::Opaque(_) => return None,
    }

    Some(Value::Object(object))
}

/// [`render_json_value`] serialized to a single line.
pub fn render_json(record: &LogRecord) -> Option<String> {
    render_json_value(record).and_then(|value| serde_json::to_string(&value).ok())
}
