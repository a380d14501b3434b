//! Pipeline stage contract and the stateless transform stages

use super::error::Result;
use super::event::LogEvent;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// One unit in the pipeline: a pure transform over batches plus an async
/// flush for whatever the stage has buffered.
///
/// `emit` must preserve the relative order of the events it keeps; it is the
/// caller's bug, not the stage's, if a supplied predicate or enricher panics.
#[async_trait]
pub trait PipelineStage: Send + Sync {
    /// Transform or filter a batch, handing the survivors downstream.
    fn emit(&self, events: Vec<LogEvent>) -> Vec<LogEvent>;

    /// Resolve once any buffered work has been handed downstream.
    async fn flush(&self) -> Result<()>;

    /// Stage name used in error reporting.
    fn name(&self) -> &str;
}

type Predicate = Box<dyn Fn(&LogEvent) -> bool + Send + Sync>;

/// Keeps only events matching a predicate; order-preserving and stateless.
pub struct FilterStage {
    predicate: Predicate,
}

impl FilterStage {
    pub fn new(predicate: impl Fn(&LogEvent) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Box::new(predicate),
        }
    }
}

#[async_trait]
impl PipelineStage for FilterStage {
    fn emit(&self, events: Vec<LogEvent>) -> Vec<LogEvent> {
        events.into_iter().filter(|e| (self.predicate)(e)).collect()
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "filter"
    }
}

type Enricher = Box<dyn Fn(&HashMap<String, Value>) -> HashMap<String, Value> + Send + Sync>;

/// Augments each event's properties with additional key/value pairs.
///
/// The enricher sees the event's current properties (enabling conditional
/// masking of values like passwords) but cannot mutate them; only the pairs
/// it returns are merged in, overwriting same-named keys.
pub struct EnrichStage {
    enricher: Enricher,
}

impl EnrichStage {
    pub fn new(
        enricher: impl Fn(&HashMap<String, Value>) -> HashMap<String, Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            enricher: Box::new(enricher),
        }
    }

    /// Enrich every event with the same static key/value pairs.
    pub fn with_properties(properties: HashMap<String, Value>) -> Self {
        Self::new(move |_| properties.clone())
    }
}

#[async_trait]
impl PipelineStage for EnrichStage {
    fn emit(&self, events: Vec<LogEvent>) -> Vec<LogEvent> {
        events
            .into_iter()
            .map(|mut event| {
                let extra = (self.enricher)(&event.properties);
                event.properties.extend(extra);
                event
            })
            .collect()
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "enrich"
    }
}
