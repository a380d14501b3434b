//! Log event structure

use super::level::LogEventLevel;
use super::template::MessageTemplate;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::fmt;

/// A single logged event moving through the pipeline.
///
/// Created once per log call and never mutated afterwards; enrichment stages
/// produce a merged property map rather than editing the caller's keys in
/// place.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogEventLevel,
    pub message_template: MessageTemplate,
    pub properties: HashMap<String, Value>,
    /// Rendered form of an error attached at the log call site
    pub error: Option<String>,
}

impl LogEvent {
    pub fn new(
        level: LogEventLevel,
        message_template: MessageTemplate,
        properties: HashMap<String, Value>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message_template,
            properties,
            error: None,
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: impl fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Render the message template against this event's properties.
    pub fn render_message(&self) -> String {
        self.message_template.render(Some(&self.properties))
    }

    /// Serialize the event for transport as one element of a JSON batch.
    pub fn to_json(&self) -> Value {
        let mut properties = Map::new();
        for (key, value) in &self.properties {
            properties.insert(key.clone(), value.clone());
        }

        let mut event = json!({
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            "level": self.level.to_str(),
            "messageTemplate": self.message_template.raw(),
            "message": self.render_message(),
            "properties": Value::Object(properties),
        });
        if let Some(ref error) = self.error {
            event["error"] = json!(error);
        }
        event
    }
}
