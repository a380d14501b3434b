//! Declarative logger configuration
//!
//! Mirrors the fluent builder for deployments that keep logging settings in
//! a JSON document instead of code:
//!
//! ```json
//! {
//!   "min_level": "information",
//!   "write_to": [
//!     { "type": "console", "include_timestamps": true },
//!     { "type": "http", "address": "https://logs.example.com" }
//!   ]
//! }
//! ```

use super::error::{LoggerError, Result};
use super::logger::{Logger, LoggerBuilder};
use serde::Deserialize;
#[cfg(feature = "http")]
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerConfig {
    /// Optional minimum level label, validated when the logger is built.
    #[serde(default)]
    pub min_level: Option<String>,
    #[serde(default = "default_suppress_errors")]
    pub suppress_errors: bool,
    pub write_to: Vec<SinkConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum SinkConfig {
    #[cfg(feature = "console")]
    Console {
        #[serde(default)]
        include_timestamps: bool,
        #[serde(default)]
        include_properties: bool,
        #[serde(default)]
        remove_level_prefix: bool,
        #[serde(default = "default_use_colors")]
        use_colors: bool,
    },
    #[cfg(feature = "http")]
    Http {
        address: String,
        #[serde(default = "default_max_batch_size")]
        max_batch_size: usize,
        #[serde(default = "default_flush_interval_ms")]
        flush_interval_ms: u64,
        #[serde(default = "default_max_retries")]
        max_retries: u32,
        #[serde(default = "default_retry_backoff_ms")]
        retry_backoff_ms: u64,
    },
}

fn default_suppress_errors() -> bool {
    true
}

#[cfg(feature = "console")]
fn default_use_colors() -> bool {
    true
}

#[cfg(feature = "http")]
fn default_max_batch_size() -> usize {
    crate::sinks::batched::BatchedSinkOptions::default().max_batch_size
}

#[cfg(feature = "http")]
fn default_flush_interval_ms() -> u64 {
    crate::sinks::batched::BatchedSinkOptions::default()
        .flush_interval
        .as_millis() as u64
}

#[cfg(feature = "http")]
fn default_max_retries() -> u32 {
    crate::sinks::batched::BatchedSinkOptions::default().max_retries
}

#[cfg(feature = "http")]
fn default_retry_backoff_ms() -> u64 {
    crate::sinks::batched::BatchedSinkOptions::default()
        .retry_backoff
        .as_millis() as u64
}

impl LoggerConfig {
    /// Parse a configuration document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Turn the configuration into a builder with every setting applied.
    ///
    /// # Errors
    ///
    /// Fails if `write_to` is empty or an HTTP sink address is invalid.
    /// HTTP sinks spawn their delivery worker here, so this must run inside
    /// a tokio runtime when any are configured.
    pub fn into_builder(self) -> Result<LoggerBuilder> {
        if self.write_to.is_empty() {
            return Err(LoggerError::config(
                "write_to",
                "at least one sink is required",
            ));
        }

        let mut builder = LoggerBuilder::new().suppress_errors(self.suppress_errors);
        if let Some(label) = self.min_level {
            builder = builder.min_level_label(label);
        }

        for sink in self.write_to {
            builder = match sink {
                #[cfg(feature = "console")]
                SinkConfig::Console {
                    include_timestamps,
                    include_properties,
                    remove_level_prefix,
                    use_colors,
                } => builder.write_to(crate::sinks::console::ConsoleSink::with_options(
                    crate::sinks::console::ConsoleSinkOptions {
                        include_timestamps,
                        include_properties,
                        remove_level_prefix,
                        use_colors,
                    },
                )),
                #[cfg(feature = "http")]
                SinkConfig::Http {
                    address,
                    max_batch_size,
                    flush_interval_ms,
                    max_retries,
                    retry_backoff_ms,
                } => {
                    let transport = crate::sinks::http::HttpTransport::new(&address)?;
                    let options = crate::sinks::batched::BatchedSinkOptions {
                        max_batch_size,
                        flush_interval: Duration::from_millis(flush_interval_ms),
                        max_retries,
                        retry_backoff: Duration::from_millis(retry_backoff_ms),
                    };
                    builder.write_to(crate::sinks::batched::BatchedSink::new(transport, options))
                }
            };
        }

        Ok(builder)
    }

    /// Shorthand for `into_builder()?.build()`.
    pub fn build(self) -> Result<Logger> {
        self.into_builder()?.build()
    }
}
