//! Logger front end and fluent builder

use super::error::Result;
use super::event::LogEvent;
use super::level::{is_enabled, LogEventLevel};
use super::pipeline::Pipeline;
use super::stage::{EnrichStage, FilterStage, PipelineStage};
use super::switch::{DynamicLevelSwitch, DynamicLevelSwitchStage};
use super::template::MessageTemplate;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The producer-facing surface of a built pipeline.
///
/// With error suppression on (the default) a failing sink never crashes the
/// producer's call site: runtime failures during log calls and flushes are
/// swallowed. With suppression off they propagate to the caller.
pub struct Logger {
    pipeline: Arc<Pipeline>,
    suppress_errors: bool,
}

impl Logger {
    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use templog::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogEventLevel::DEBUG)
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn suppress_errors(&self) -> bool {
        self.suppress_errors
    }

    /// Log a templated event at the given level.
    pub fn log(&self, level: LogEventLevel, template: &str, args: &[Value]) -> Result<()> {
        self.guard(self.try_log(level, template, args, None))
    }

    /// Log a templated event carrying an error value.
    pub fn log_with_error(
        &self,
        level: LogEventLevel,
        error: impl fmt::Display,
        template: &str,
        args: &[Value],
    ) -> Result<()> {
        self.guard(self.try_log(level, template, args, Some(error.to_string())))
    }

    pub fn fatal(&self, template: &str, args: &[Value]) -> Result<()> {
        self.log(LogEventLevel::FATAL, template, args)
    }

    pub fn error(&self, template: &str, args: &[Value]) -> Result<()> {
        self.log(LogEventLevel::ERROR, template, args)
    }

    pub fn warn(&self, template: &str, args: &[Value]) -> Result<()> {
        self.log(LogEventLevel::WARNING, template, args)
    }

    pub fn info(&self, template: &str, args: &[Value]) -> Result<()> {
        self.log(LogEventLevel::INFORMATION, template, args)
    }

    pub fn debug(&self, template: &str, args: &[Value]) -> Result<()> {
        self.log(LogEventLevel::DEBUG, template, args)
    }

    pub fn verbose(&self, template: &str, args: &[Value]) -> Result<()> {
        self.log(LogEventLevel::VERBOSE, template, args)
    }

    /// Emit pre-built events directly into the pipeline.
    pub fn emit(&self, events: Vec<LogEvent>) {
        self.pipeline.emit(events);
    }

    /// Flush every stage of the pipeline.
    pub async fn flush(&self) -> Result<()> {
        let result = self.pipeline.flush().await;
        if self.suppress_errors {
            return Ok(());
        }
        result
    }

    fn try_log(
        &self,
        level: LogEventLevel,
        template: &str,
        args: &[Value],
        error: Option<String>,
    ) -> Result<()> {
        let template = MessageTemplate::parse(template)?;
        let properties = template.bind_properties(args);
        let mut event = LogEvent::new(level, template, properties);
        if let Some(error) = error {
            event = event.with_error(error);
        }
        self.pipeline.emit(vec![event]);
        Ok(())
    }

    fn guard(&self, result: Result<()>) -> Result<()> {
        if self.suppress_errors {
            return Ok(());
        }
        result
    }
}

enum BuilderStage {
    Ready(Box<dyn PipelineStage>),
    /// Level label resolved (and validated) at build time
    MinLevelLabel(String),
}

/// Fluent configuration for a [`Logger`].
///
/// Stage order follows call order: a `filter` registered before an `enrich`
/// runs first, and sinks registered with `write_to` always run last.
///
/// # Example
/// ```
/// use templog::prelude::*;
///
/// let logger = Logger::builder()
///     .min_level_label("warning")
///     .enrich_with([("env".to_string(), serde_json::json!("prod"))].into_iter().collect())
///     .build()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    stages: Vec<BuilderStage>,
    sinks: Vec<Box<dyn PipelineStage>>,
    switches: Vec<DynamicLevelSwitch>,
    suppress_errors: bool,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            sinks: Vec::new(),
            switches: Vec::new(),
            suppress_errors: true,
        }
    }

    /// Filter out events below a fixed minimum level.
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogEventLevel) -> Self {
        self.stages
            .push(BuilderStage::Ready(Box::new(FilterStage::new(
                move |e| is_enabled(level, e.level),
            ))));
        self
    }

    /// Filter by a case-insensitive level label ("warning", "INFO", ...).
    ///
    /// The label is validated when the logger is built; an unrecognized
    /// label fails fast.
    #[must_use = "builder methods return a new value"]
    pub fn min_level_label(mut self, label: impl Into<String>) -> Self {
        self.stages.push(BuilderStage::MinLevelLabel(label.into()));
        self
    }

    /// Filter by a numeric level bitmask.
    #[must_use = "builder methods return a new value"]
    pub fn min_level_bits(self, bits: u32) -> Self {
        self.min_level(LogEventLevel::from_bits(bits))
    }

    /// Filter through a runtime-mutable level switch. Building the logger
    /// wires the pipeline's flush into the switch, so level changes drain
    /// pending events first.
    #[must_use = "builder methods return a new value"]
    pub fn min_level_switch(mut self, switch: &DynamicLevelSwitch) -> Self {
        self.stages
            .push(BuilderStage::Ready(Box::new(DynamicLevelSwitchStage::new(
                switch.clone(),
            ))));
        self.switches.push(switch.clone());
        self
    }

    /// Keep only events matching the predicate.
    #[must_use = "builder methods return a new value"]
    pub fn filter(
        mut self,
        predicate: impl Fn(&LogEvent) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.stages
            .push(BuilderStage::Ready(Box::new(FilterStage::new(predicate))));
        self
    }

    /// Enrich events with properties returned from a function.
    #[must_use = "builder methods return a new value"]
    pub fn enrich(
        mut self,
        enricher: impl Fn(&HashMap<String, Value>) -> HashMap<String, Value>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.stages
            .push(BuilderStage::Ready(Box::new(EnrichStage::new(enricher))));
        self
    }

    /// Enrich events with a static property mapping.
    #[must_use = "builder methods return a new value"]
    pub fn enrich_with(mut self, properties: HashMap<String, Value>) -> Self {
        self.stages
            .push(BuilderStage::Ready(Box::new(EnrichStage::with_properties(
                properties,
            ))));
        self
    }

    /// Add a sink; sinks run after every other stage, in registration order.
    #[must_use = "builder methods return a new value"]
    pub fn write_to<S: PipelineStage + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Control whether runtime emit/flush failures are swallowed (default)
    /// or propagated to the caller. The last call wins.
    #[must_use = "builder methods return a new value"]
    pub fn suppress_errors(mut self, suppress: bool) -> Self {
        self.suppress_errors = suppress;
        self
    }

    /// Build the logger.
    ///
    /// # Errors
    ///
    /// Fails fast with [`crate::LoggerError::InvalidConfiguration`] on an
    /// unrecognized level label.
    pub fn build(self) -> Result<Logger> {
        let mut pipeline = Pipeline::new();

        for stage in self.stages {
            match stage {
                BuilderStage::Ready(stage) => pipeline.add_stage(stage),
                BuilderStage::MinLevelLabel(label) => {
                    let level: LogEventLevel = label.parse()?;
                    pipeline.add_stage(Box::new(FilterStage::new(move |e| {
                        is_enabled(level, e.level)
                    })));
                }
            }
        }
        for sink in self.sinks {
            pipeline.add_stage(sink);
        }

        let pipeline = Arc::new(pipeline);
        for switch in self.switches {
            let pipeline = Arc::clone(&pipeline);
            switch.set_flush_delegate(Arc::new(move || {
                let pipeline = Arc::clone(&pipeline);
                Box::pin(async move { pipeline.flush().await })
            }));
        }

        Ok(Logger {
            pipeline,
            suppress_errors: self.suppress_errors,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
