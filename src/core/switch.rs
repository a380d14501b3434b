//! Runtime-mutable minimum level switch

use super::error::Result;
use super::event::LogEvent;
use super::level::{is_enabled, LogEventLevel};
use super::stage::PipelineStage;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Callback a switch invokes to drain pending work before a level change
/// takes effect.
pub type FlushDelegate =
    Arc<dyn Fn() -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send + Sync>;

struct SwitchInner {
    level: AtomicU32,
    flush_delegate: RwLock<Option<FlushDelegate>>,
}

/// A mutable minimum-level cell that can be changed at runtime.
///
/// Cloning produces another handle to the same cell. `is_enabled` is a single
/// atomic load, so the level can be flipped while producers are logging
/// without them ever observing a torn update.
#[derive(Clone)]
pub struct DynamicLevelSwitch {
    inner: Arc<SwitchInner>,
}

impl DynamicLevelSwitch {
    pub fn new(initial: LogEventLevel) -> Self {
        Self {
            inner: Arc::new(SwitchInner {
                level: AtomicU32::new(initial.bits()),
                flush_delegate: RwLock::new(None),
            }),
        }
    }

    pub fn current_level(&self) -> LogEventLevel {
        LogEventLevel::from_bits(self.inner.level.load(Ordering::Acquire))
    }

    pub fn is_enabled(&self, level: LogEventLevel) -> bool {
        is_enabled(self.current_level(), level)
    }

    /// Change the minimum level, then invoke and await the flush delegate so
    /// events pending under the old level are drained before `set` resolves.
    pub async fn set(&self, level: LogEventLevel) -> Result<()> {
        self.inner.level.store(level.bits(), Ordering::Release);
        let delegate = self.inner.flush_delegate.read().clone();
        if let Some(delegate) = delegate {
            delegate().await?;
        }
        Ok(())
    }

    pub async fn fatal(&self) -> Result<()> {
        self.set(LogEventLevel::FATAL).await
    }

    pub async fn error(&self) -> Result<()> {
        self.set(LogEventLevel::ERROR).await
    }

    pub async fn warning(&self) -> Result<()> {
        self.set(LogEventLevel::WARNING).await
    }

    pub async fn information(&self) -> Result<()> {
        self.set(LogEventLevel::INFORMATION).await
    }

    pub async fn debug(&self) -> Result<()> {
        self.set(LogEventLevel::DEBUG).await
    }

    pub async fn verbose(&self) -> Result<()> {
        self.set(LogEventLevel::VERBOSE).await
    }

    pub async fn off(&self) -> Result<()> {
        self.set(LogEventLevel::OFF).await
    }

    pub fn set_flush_delegate(&self, delegate: FlushDelegate) {
        *self.inner.flush_delegate.write() = Some(delegate);
    }
}

/// Everything enabled until told otherwise.
impl Default for DynamicLevelSwitch {
    fn default() -> Self {
        Self::new(LogEventLevel::VERBOSE)
    }
}

/// Pipeline stage filtering each batch against a [`DynamicLevelSwitch`].
pub struct DynamicLevelSwitchStage {
    switch: DynamicLevelSwitch,
}

impl DynamicLevelSwitchStage {
    pub fn new(switch: DynamicLevelSwitch) -> Self {
        Self { switch }
    }

    /// Wire the owning pipeline's flush into the switch so level changes
    /// drain the pipeline first.
    pub fn set_flush_delegate(&self, delegate: FlushDelegate) {
        self.switch.set_flush_delegate(delegate);
    }
}

#[async_trait]
impl PipelineStage for DynamicLevelSwitchStage {
    fn emit(&self, events: Vec<LogEvent>) -> Vec<LogEvent> {
        events
            .into_iter()
            .filter(|e| self.switch.is_enabled(e.level))
            .collect()
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "level-switch"
    }
}
