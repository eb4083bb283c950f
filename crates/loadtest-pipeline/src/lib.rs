//! Streaming pipeline for tsdb-loadgen.
//!
//! Connects a record source (normally a `RecordGenerator`) to a [`Sink`]
//! through a bounded queue of batches, so generation and output overlap
//! while memory use stays fixed.
//!
//! ```text
//!  spawn_blocking                      async consumer
//! ┌──────────────┐  EncodedBatch  ┌──────────────────┐
//! │   producer   │ ─────────────▶ │  poll + write    │ ──▶ Sink
//! │ (batching)   │   mpsc(cap)    │  DrainGuard      │
//! └──────────────┘                └──────────────────┘
//! ```

pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod sink;

pub use error::PipelineError;
pub use metrics::PipelineMetrics;
pub use pipeline::{
    DrainGuard, EncodedBatch, PipelineConfig, PipelineState, StreamingPipeline,
    DEFAULT_BATCH_SIZE, DEFAULT_POLL_TIMEOUT, DEFAULT_QUEUE_CAPACITY, PROGRESS_INTERVAL,
};
pub use sink::{FileSink, Sink, WriterSink, DEFAULT_BUFFER_SIZE};
