//! Batched delivery sink
//!
//! Accumulates events and flushes them to a transport under size or time
//! pressure, with bounded retry and graceful degradation on persistent
//! failure. A single worker task owns the buffer and the flush timer, so at
//! most one delivery cycle is ever in flight; flushes requested while one is
//! active queue behind it in arrival order.

use crate::core::{LogEvent, LoggerError, PipelineStage, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

/// Destination a batched sink delivers through.
///
/// `send` reports ordinary transport failures as `Err` outcomes rather than
/// panicking, so the sink's retry policy can act on them uniformly.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, events: &[LogEvent]) -> Result<()>;

    /// Destination description used in sink naming and delivery errors.
    fn endpoint(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct BatchedSinkOptions {
    /// Buffer size that triggers an immediate flush
    pub max_batch_size: usize,
    /// Maximum time a buffered event waits before delivery
    pub flush_interval: Duration,
    /// Delivery attempts per cycle before the batch is dropped
    pub max_retries: u32,
    /// Base delay between attempts, doubled after each failure
    pub retry_backoff: Duration,
}

impl Default for BatchedSinkOptions {
    fn default() -> Self {
        Self {
            max_batch_size: 100,
            flush_interval: Duration::from_secs(2),
            max_retries: 3,
            retry_backoff: Duration::from_millis(100),
        }
    }
}

enum SinkCommand {
    Emit(Vec<LogEvent>),
    Flush(oneshot::Sender<Result<()>>),
}

/// A sink stage that buffers events and hands them to a [`Transport`] in
/// batches. Requires a tokio runtime.
pub struct BatchedSink {
    tx: mpsc::UnboundedSender<SinkCommand>,
    name: String,
}

impl BatchedSink {
    /// Create the sink and spawn its delivery worker.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, since the delivery worker
    /// is spawned here.
    pub fn new<T: Transport + 'static>(transport: T, options: BatchedSinkOptions) -> Self {
        let mut options = options;
        options.max_batch_size = options.max_batch_size.max(1);
        options.max_retries = options.max_retries.max(1);

        let name = format!("batched({})", transport.endpoint());
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(Arc::new(transport), options, rx));
        Self { tx, name }
    }
}

#[async_trait]
impl PipelineStage for BatchedSink {
    fn emit(&self, events: Vec<LogEvent>) -> Vec<LogEvent> {
        if !events.is_empty() {
            // Worker gone means the runtime is shutting down; nothing to do.
            let _ = self.tx.send(SinkCommand::Emit(events.clone()));
        }
        events
    }

    async fn flush(&self) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(SinkCommand::Flush(ack_tx))
            .map_err(|_| LoggerError::WorkerGone)?;
        ack_rx.await.map_err(|_| LoggerError::WorkerGone)?
    }

    fn name(&self) -> &str {
        &self.name
    }
}

async fn run_worker(
    transport: Arc<dyn Transport>,
    options: BatchedSinkOptions,
    mut rx: mpsc::UnboundedReceiver<SinkCommand>,
) {
    let mut buffer: Vec<LogEvent> = Vec::new();
    // Armed when the first event is buffered, cleared once the buffer empties.
    let mut deadline: Option<Instant> = None;

    loop {
        let command = match deadline {
            Some(at) => {
                tokio::select! {
                    command = rx.recv() => command,
                    _ = tokio::time::sleep_until(at) => {
                        if let Err(e) = deliver(&*transport, &options, &mut buffer).await {
                            eprintln!("[TEMPLOG ERROR] {}", e);
                        }
                        deadline = None;
                        continue;
                    }
                }
            }
            None => rx.recv().await,
        };

        match command {
            Some(SinkCommand::Emit(events)) => {
                if events.is_empty() {
                    continue;
                }
                if buffer.is_empty() {
                    deadline = Some(Instant::now() + options.flush_interval);
                }
                buffer.extend(events);
                if buffer.len() >= options.max_batch_size {
                    if let Err(e) = deliver(&*transport, &options, &mut buffer).await {
                        eprintln!("[TEMPLOG ERROR] {}", e);
                    }
                    deadline = None;
                }
            }
            Some(SinkCommand::Flush(ack)) => {
                let result = deliver(&*transport, &options, &mut buffer).await;
                deadline = None;
                let _ = ack.send(result);
            }
            None => {
                // Sink dropped; final best-effort drain.
                if let Err(e) = deliver(&*transport, &options, &mut buffer).await {
                    eprintln!("[TEMPLOG ERROR] {}", e);
                }
                break;
            }
        }
    }
}

/// Doubling stops here so the backoff factor cannot overflow with a large
/// retry ceiling.
const MAX_BACKOFF_DOUBLINGS: u32 = 16;

/// One delivery cycle: attempt the whole buffer, retrying with doubling
/// backoff up to the configured ceiling. Success clears the buffer; an
/// exhausted ceiling drops the batch and surfaces the failure exactly once.
async fn deliver(
    transport: &dyn Transport,
    options: &BatchedSinkOptions,
    buffer: &mut Vec<LogEvent>,
) -> Result<()> {
    if buffer.is_empty() {
        return Ok(());
    }

    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match transport.send(buffer).await {
            Ok(()) => {
                buffer.clear();
                return Ok(());
            }
            Err(_) if attempts < options.max_retries => {
                let factor = 1u32 << (attempts - 1).min(MAX_BACKOFF_DOUBLINGS);
                tokio::time::sleep(options.retry_backoff.saturating_mul(factor)).await;
            }
            Err(e) => {
                let dropped = buffer.len();
                buffer.clear();
                return Err(LoggerError::delivery(
                    transport.endpoint(),
                    attempts,
                    format!("dropping {} event(s): {}", dropped, e),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogEventLevel, MessageTemplate};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct RecordingTransport {
        batch_sizes: Arc<Mutex<Vec<usize>>>,
        attempts: Arc<AtomicU32>,
        fail: bool,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, events: &[LogEvent]) -> Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LoggerError::other("simulated outage"));
            }
            self.batch_sizes.lock().push(events.len());
            Ok(())
        }

        fn endpoint(&self) -> &str {
            "test://collector"
        }
    }

    fn event(raw: &str) -> LogEvent {
        LogEvent::new(
            LogEventLevel::INFORMATION,
            MessageTemplate::parse(raw).unwrap(),
            HashMap::new(),
        )
    }

    fn fast_options(max_batch_size: usize) -> BatchedSinkOptions {
        BatchedSinkOptions {
            max_batch_size,
            flush_interval: Duration::from_secs(60),
            max_retries: 3,
            retry_backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_size_threshold_triggers_full_batches() {
        let batch_sizes = Arc::new(Mutex::new(Vec::new()));
        let sink = BatchedSink::new(
            RecordingTransport {
                batch_sizes: Arc::clone(&batch_sizes),
                attempts: Arc::new(AtomicU32::new(0)),
                fail: false,
            },
            fast_options(2),
        );

        for i in 0..5 {
            sink.emit(vec![event(&format!("Message {}", i))]);
        }
        sink.flush().await.unwrap();

        assert_eq!(*batch_sizes.lock(), vec![2, 2, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_bounds_delivery_latency() {
        let batch_sizes = Arc::new(Mutex::new(Vec::new()));
        let sink = BatchedSink::new(
            RecordingTransport {
                batch_sizes: Arc::clone(&batch_sizes),
                attempts: Arc::new(AtomicU32::new(0)),
                fail: false,
            },
            BatchedSinkOptions {
                max_batch_size: 100,
                flush_interval: Duration::from_millis(50),
                ..Default::default()
            },
        );

        sink.emit(vec![event("Message")]);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(*batch_sizes.lock(), vec![1]);
    }

    #[tokio::test]
    async fn test_persistent_failure_drops_batch_after_ceiling() {
        let attempts = Arc::new(AtomicU32::new(0));
        let sink = BatchedSink::new(
            RecordingTransport {
                batch_sizes: Arc::new(Mutex::new(Vec::new())),
                attempts: Arc::clone(&attempts),
                fail: true,
            },
            fast_options(100),
        );

        sink.emit(vec![event("Message")]);
        let err = sink.flush().await.unwrap_err();
        match err {
            LoggerError::DeliveryFailure {
                attempts: reported, ..
            } => assert_eq!(reported, 3),
            other => panic!("expected DeliveryFailure, got {}", other),
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 3);

        // The batch is gone: a second flush delivers nothing and succeeds.
        sink.flush().await.unwrap();
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_large_retry_ceiling_keeps_the_worker_alive() {
        let attempts = Arc::new(AtomicU32::new(0));
        let sink = BatchedSink::new(
            RecordingTransport {
                batch_sizes: Arc::new(Mutex::new(Vec::new())),
                attempts: Arc::clone(&attempts),
                fail: true,
            },
            BatchedSinkOptions {
                max_batch_size: 100,
                flush_interval: Duration::from_secs(60),
                max_retries: 40,
                retry_backoff: Duration::from_millis(1),
            },
        );

        sink.emit(vec![event("Message")]);
        let err = sink.flush().await.unwrap_err();
        match err {
            LoggerError::DeliveryFailure {
                attempts: reported, ..
            } => assert_eq!(reported, 40),
            other => panic!("expected DeliveryFailure, got {}", other),
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 40);

        // The worker survived the exhausted cycle and keeps serving flushes.
        sink.flush().await.unwrap();
    }

    #[tokio::test]
    async fn test_flush_on_empty_buffer_is_a_no_op() {
        let attempts = Arc::new(AtomicU32::new(0));
        let sink = BatchedSink::new(
            RecordingTransport {
                batch_sizes: Arc::new(Mutex::new(Vec::new())),
                attempts: Arc::clone(&attempts),
                fail: false,
            },
            fast_options(100),
        );

        sink.flush().await.unwrap();
        assert_eq!(attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrent_flushes_queue_behind_each_other() {
        let batch_sizes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::new(BatchedSink::new(
            RecordingTransport {
                batch_sizes: Arc::clone(&batch_sizes),
                attempts: Arc::new(AtomicU32::new(0)),
                fail: false,
            },
            fast_options(100),
        ));

        sink.emit(vec![event("Message 1"), event("Message 2")]);
        let first = {
            let sink = Arc::clone(&sink);
            tokio::spawn(async move { sink.flush().await })
        };
        let second = {
            let sink = Arc::clone(&sink);
            tokio::spawn(async move { sink.flush().await })
        };

        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        // One cycle delivered both events; the queued flush saw an empty buffer.
        assert_eq!(*batch_sizes.lock(), vec![2]);
    }
}
