//! Console sink implementation

use crate::core::{is_enabled, LogEvent, LogEventLevel, PipelineStage, Result};
use async_trait::async_trait;
use chrono::SecondsFormat;
use colored::Colorize;

#[derive(Debug, Clone)]
pub struct ConsoleSinkOptions {
    pub include_timestamps: bool,
    pub include_properties: bool,
    pub remove_level_prefix: bool,
    pub use_colors: bool,
}

impl Default for ConsoleSinkOptions {
    fn default() -> Self {
        Self {
            include_timestamps: false,
            include_properties: false,
            remove_level_prefix: false,
            use_colors: true,
        }
    }
}

/// Renders each event directly to the terminal. Fatal and error events go to
/// stderr, everything else to stdout.
pub struct ConsoleSink {
    options: ConsoleSinkOptions,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            options: ConsoleSinkOptions::default(),
        }
    }

    pub fn with_options(options: ConsoleSinkOptions) -> Self {
        Self { options }
    }

    fn format_event(&self, event: &LogEvent) -> String {
        let mut line = String::new();

        if self.options.include_timestamps {
            line.push_str(&event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true));
            line.push(' ');
        }

        if !self.options.remove_level_prefix {
            let tag = format!("[{}]", event.level);
            if self.options.use_colors {
                line.push_str(&tag.color(event.level.color_code()).to_string());
            } else {
                line.push_str(&tag);
            }
            line.push(' ');
        }

        line.push_str(&event.render_message());

        if self.options.include_properties && !event.properties.is_empty() {
            let mut keys: Vec<_> = event.properties.keys().collect();
            keys.sort();
            for key in keys {
                line.push_str(&format!(" {}={}", key, event.properties[key]));
            }
        }

        line
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PipelineStage for ConsoleSink {
    fn emit(&self, events: Vec<LogEvent>) -> Vec<LogEvent> {
        for event in &events {
            let line = self.format_event(event);
            if is_enabled(LogEventLevel::ERROR, event.level) {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        }
        events
    }

    async fn flush(&self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush().map_err(|e| {
            crate::core::LoggerError::stage("console", format!("stdout flush failed: {}", e))
        })?;
        std::io::stderr().flush().map_err(|e| {
            crate::core::LoggerError::stage("console", format!("stderr flush failed: {}", e))
        })?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MessageTemplate;
    use serde_json::json;
    use std::collections::HashMap;

    fn event() -> LogEvent {
        let template = MessageTemplate::parse("Test {word}").unwrap();
        let properties = template.bind_properties(&[json!("banana")]);
        LogEvent::new(LogEventLevel::INFORMATION, template, properties)
    }

    #[test]
    fn test_format_with_default_options() {
        let sink = ConsoleSink::with_options(ConsoleSinkOptions {
            use_colors: false,
            ..Default::default()
        });
        assert_eq!(sink.format_event(&event()), "[INFORMATION] Test banana");
    }

    #[test]
    fn test_format_without_level_prefix() {
        let sink = ConsoleSink::with_options(ConsoleSinkOptions {
            remove_level_prefix: true,
            use_colors: false,
            ..Default::default()
        });
        assert_eq!(sink.format_event(&event()), "Test banana");
    }

    #[test]
    fn test_format_with_properties() {
        let sink = ConsoleSink::with_options(ConsoleSinkOptions {
            include_properties: true,
            use_colors: false,
            ..Default::default()
        });
        assert_eq!(
            sink.format_event(&event()),
            "[INFORMATION] Test banana word=\"banana\""
        );
    }

    #[test]
    fn test_format_with_timestamps() {
        let sink = ConsoleSink::with_options(ConsoleSinkOptions {
            include_timestamps: true,
            use_colors: false,
            ..Default::default()
        });
        let formatted = sink.format_event(&event());
        assert!(formatted.ends_with("[INFORMATION] Test banana"));
        assert!(formatted.contains('T') && formatted.contains('Z'));
    }

    #[test]
    fn test_emit_passes_events_through() {
        let sink = ConsoleSink::with_options(ConsoleSinkOptions {
            use_colors: false,
            ..Default::default()
        });
        let out = sink.emit(vec![event()]);
        assert_eq!(out.len(), 1);
    }
}
