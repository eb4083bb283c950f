//! Bounded producer/consumer pipeline.
//!
//! A blocking producer task pulls encoded records from a source iterator,
//! groups them into batches and pushes the batches into a bounded queue.
//! The async consumer pops batches in FIFO order and writes every record to a
//! [`Sink`]. A full queue blocks the producer, so memory stays bounded by
//! `queue_capacity * batch_size` records plus the batch each side holds.
//!
//! Completion needs two consecutive polls that find the queue empty while
//! the producer is already finished; see [`DrainGuard`].
//!
//! An encoding error raises a shared abort flag. The consumer checks it
//! before writing each popped batch and drops whatever is still queued, so
//! at most the batch in flight is written after the failing record.

use crate::error::PipelineError;
use crate::metrics::PipelineMetrics;
use crate::sink::Sink;
use loadtest_generator::EncodingError;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Default number of records per batch.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Default number of batches the queue holds.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Default wait of a single consumer poll.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(10);

/// Log progress every this many written records.
pub const PROGRESS_INTERVAL: u64 = 100_000;

/// An ordered group of encoded records.
pub type EncodedBatch = Vec<Vec<u8>>;

/// Pipeline tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub batch_size: usize,
    pub queue_capacity: usize,
    pub poll_timeout: Duration,
}

impl PipelineConfig {
    /// Create a config, rejecting zero sizes.
    pub fn new(batch_size: usize, queue_capacity: usize) -> Result<Self, PipelineError> {
        if batch_size == 0 {
            return Err(loadtest_dataset::ConfigError::NonPositive { name: "batch_size" }.into());
        }
        if queue_capacity == 0 {
            return Err(loadtest_dataset::ConfigError::NonPositive {
                name: "queue_capacity",
            }
            .into());
        }
        Ok(Self {
            batch_size,
            queue_capacity,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        })
    }

    pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

/// Lifecycle of a pipeline run.
///
/// `Idle -> Running -> Draining -> Done`, with `Failed` reachable from
/// `Running` and `Draining`. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running,
    Draining,
    Done,
    Failed,
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Running => "running",
            PipelineState::Draining => "draining",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Termination check for the consumer.
///
/// A single empty poll after the producer finished is not enough to stop:
/// the guard needs [`DrainGuard::REQUIRED_CONFIRMATIONS`] idle observations
/// in a row, and any popped batch starts the count over.
#[derive(Debug, Default, Clone, Copy)]
pub struct DrainGuard {
    confirmations: u8,
}

impl DrainGuard {
    pub const REQUIRED_CONFIRMATIONS: u8 = 2;

    /// Record that a batch was popped.
    pub fn observe_pop(&mut self) {
        self.confirmations = 0;
    }

    /// Record an empty poll. Returns true once the consumer may stop.
    pub fn observe_idle(&mut self, producer_finished: bool) -> bool {
        if !producer_finished {
            self.confirmations = 0;
            return false;
        }
        self.confirmations = self.confirmations.saturating_add(1);
        self.confirmations >= Self::REQUIRED_CONFIRMATIONS
    }
}

/// What the producer reports when it returns normally.
#[derive(Debug, Clone, Copy, Default)]
struct ProducerSummary {
    records: u64,
    batches: u64,
}

/// Streams encoded records from a source into a sink through a bounded queue.
pub struct StreamingPipeline {
    config: PipelineConfig,
    state: PipelineState,
    cancel: CancellationToken,
}

impl StreamingPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            state: PipelineState::Idle,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token, e.g. one tied to Ctrl-C.
    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Token that aborts a running pipeline with [`PipelineError::Interrupted`].
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Drive `source` to exhaustion, writing every record to `sink` in order.
    ///
    /// Returns once all records are written and the sink is flushed. The first
    /// encoding error, sink error, cancellation or producer panic ends the run
    /// with `Failed`; records already written stay written.
    pub async fn run<I, S>(
        &mut self,
        source: I,
        sink: &mut S,
    ) -> Result<PipelineMetrics, PipelineError>
    where
        I: Iterator<Item = Result<Vec<u8>, EncodingError>> + Send + 'static,
        S: Sink + ?Sized,
    {
        if self.state != PipelineState::Idle {
            return Err(PipelineError::AlreadyStarted(self.state.name()));
        }

        let start_time = Instant::now();
        let batch_size = self.config.batch_size;
        let (tx, rx) = mpsc::channel::<EncodedBatch>(self.config.queue_capacity);
        let aborted = Arc::new(AtomicBool::new(false));
        let producer_aborted = aborted.clone();
        let producer = tokio::task::spawn_blocking(move || {
            produce(source, tx, batch_size, &producer_aborted)
        });
        self.transition(PipelineState::Running);

        match self.consume(rx, &producer, &aborted, sink, start_time).await {
            Ok(mut metrics) => match producer.await {
                Ok(Ok(summary)) => {
                    if let Err(source) = sink.flush() {
                        error!("Sink flush failed: {}", source);
                        self.transition(PipelineState::Failed);
                        return Err(PipelineError::SinkWrite {
                            records_written: metrics.records_written,
                            bytes_written: metrics.bytes_written,
                            source,
                        });
                    }
                    debug_assert_eq!(summary.records, metrics.records_written);
                    debug_assert_eq!(summary.batches, metrics.batches_written);
                    metrics.total_duration = start_time.elapsed();
                    self.transition(PipelineState::Done);
                    Ok(metrics)
                }
                Ok(Err(e)) => {
                    self.transition(PipelineState::Failed);
                    Err(e)
                }
                Err(join_error) => {
                    self.transition(PipelineState::Failed);
                    Err(PipelineError::ProducerPanicked(join_error.to_string()))
                }
            },
            Err(e) => {
                self.transition(PipelineState::Failed);
                if matches!(e, PipelineError::Interrupted) {
                    // Receiver is gone, so a blocked producer wakes up and returns
                    let _ = producer.await;
                }
                Err(e)
            }
        }
    }

    /// Pop batches until the drain guard is satisfied.
    ///
    /// Consumes the receiver so it is dropped on every exit path.
    async fn consume<S, T>(
        &mut self,
        mut rx: mpsc::Receiver<EncodedBatch>,
        producer: &JoinHandle<T>,
        aborted: &AtomicBool,
        sink: &mut S,
        start_time: Instant,
    ) -> Result<PipelineMetrics, PipelineError>
    where
        S: Sink + ?Sized,
    {
        let mut metrics = PipelineMetrics::default();
        let mut guard = DrainGuard::default();
        let poll_timeout = self.config.poll_timeout;
        let cancel = self.cancel.clone();

        loop {
            let polled = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!(
                        "Pipeline cancelled after {} records",
                        metrics.records_written
                    );
                    return Err(PipelineError::Interrupted);
                }
                polled = tokio::time::timeout(poll_timeout, rx.recv()) => polled,
            };

            match polled {
                Ok(Some(_)) if aborted.load(Ordering::Acquire) => {
                    debug!(
                        "Producer aborted; dropping {} queued batches",
                        rx.len() + 1
                    );
                    break;
                }
                Ok(Some(batch)) => {
                    guard.observe_pop();
                    metrics.max_queue_depth = metrics.max_queue_depth.max(rx.len());
                    write_batch(sink, &batch, &mut metrics)?;
                }
                Ok(None) => {
                    // Channel closed and empty; recv would return at once
                    if self.observe_idle(&mut guard, producer.is_finished()) {
                        break;
                    }
                    tokio::time::sleep(poll_timeout).await;
                }
                Err(_elapsed) => {
                    if self.observe_idle(&mut guard, producer.is_finished()) {
                        break;
                    }
                }
            }
        }

        metrics.total_duration = start_time.elapsed();
        Ok(metrics)
    }

    fn observe_idle(&mut self, guard: &mut DrainGuard, producer_finished: bool) -> bool {
        if producer_finished && self.state == PipelineState::Running {
            self.transition(PipelineState::Draining);
        }
        guard.observe_idle(producer_finished)
    }

    fn transition(&mut self, next: PipelineState) {
        debug!("Pipeline state: {} -> {}", self.state, next);
        self.state = next;
    }
}

fn write_batch<S: Sink + ?Sized>(
    sink: &mut S,
    batch: &EncodedBatch,
    metrics: &mut PipelineMetrics,
) -> Result<(), PipelineError> {
    for record in batch {
        match sink.write_record(record) {
            Ok(bytes) => {
                metrics.records_written += 1;
                metrics.bytes_written += bytes as u64;
                if metrics.records_written % PROGRESS_INTERVAL == 0 {
                    debug!(
                        "Progress: {} records written ({} bytes)",
                        metrics.records_written, metrics.bytes_written
                    );
                }
            }
            Err(source) => {
                error!(
                    "Sink write failed after {} records ({} bytes): {}",
                    metrics.records_written, metrics.bytes_written, source
                );
                return Err(PipelineError::SinkWrite {
                    records_written: metrics.records_written,
                    bytes_written: metrics.bytes_written,
                    source,
                });
            }
        }
    }
    metrics.batches_written += 1;
    Ok(())
}

/// Producer loop, run on the blocking pool.
///
/// Raises `aborted` before returning an encoding error.
fn produce<I>(
    source: I,
    tx: mpsc::Sender<EncodedBatch>,
    batch_size: usize,
    aborted: &AtomicBool,
) -> Result<ProducerSummary, PipelineError>
where
    I: Iterator<Item = Result<Vec<u8>, EncodingError>>,
{
    let mut summary = ProducerSummary::default();
    let mut batch: EncodedBatch = Vec::with_capacity(batch_size);

    for item in source {
        match item {
            Ok(record) => batch.push(record),
            Err(e) => {
                aborted.store(true, Ordering::Release);
                error!("Encoding failed after {} records: {}", summary.records, e);
                return Err(e.into());
            }
        }
        summary.records += 1;

        if batch.len() == batch_size {
            let full = std::mem::replace(&mut batch, Vec::with_capacity(batch_size));
            tx.blocking_send(full)
                .map_err(|_| PipelineError::Interrupted)?;
            summary.batches += 1;
        }
    }

    if !batch.is_empty() {
        // Trailing batch: offer it without blocking, then wait if the queue is full
        match tx.try_send(batch) {
            Ok(()) => {}
            Err(TrySendError::Full(batch)) => {
                tx.blocking_send(batch)
                    .map_err(|_| PipelineError::Interrupted)?;
            }
            Err(TrySendError::Closed(_)) => return Err(PipelineError::Interrupted),
        }
        summary.batches += 1;
    }

    debug!(
        "Producer finished: {} records in {} batches",
        summary.records, summary.batches
    );
    Ok(summary)
}
