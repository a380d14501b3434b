//! Ordered chain of pipeline stages

use super::error::Result;
use super::event::LogEvent;
use super::stage::PipelineStage;
use parking_lot::Mutex;

/// An ordered sequence of stages; insertion order is execution order.
///
/// Stages are appended at construction time and never removed or reordered
/// once the logger is built.
pub struct Pipeline {
    stages: Vec<Box<dyn PipelineStage>>,
    /// Serializes batch traversal so one call's batch passes every stage
    /// before the next call's batch begins.
    emit_lock: Mutex<()>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            emit_lock: Mutex::new(()),
        }
    }

    pub fn add_stage(&mut self, stage: Box<dyn PipelineStage>) {
        self.stages.push(stage);
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Push a batch through every stage in registration order, feeding each
    /// stage's output to the next. Stages after a filter only see survivors.
    pub fn emit(&self, events: Vec<LogEvent>) {
        let _guard = self.emit_lock.lock();
        let mut batch = events;
        for stage in &self.stages {
            if batch.is_empty() {
                return;
            }
            batch = stage.emit(batch);
        }
    }

    /// Flush every stage and wait for all to complete.
    ///
    /// Every stage's flush is initiated even when an earlier one fails; the
    /// first failure is surfaced once all stages have been given the chance
    /// to drain.
    pub async fn flush(&self) -> Result<()> {
        let mut first_failure = None;
        for stage in &self.stages {
            if let Err(e) = stage.flush().await {
                first_failure.get_or_insert(e);
            }
        }
        match first_failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
