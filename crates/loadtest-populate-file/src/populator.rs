//! File populator for load testing.

use crate::error::FilePopulatorError;
use loadtest_dataset::DatasetSchema;
use loadtest_generator::{Encoder, EncodingMode, RecordGenerator, DEFAULT_SEPARATOR};
use loadtest_pipeline::{
    FileSink, PipelineConfig, PipelineMetrics, Sink, StreamingPipeline, WriterSink,
    DEFAULT_BUFFER_SIZE,
};
use std::io::{self, BufWriter};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Metrics from a populate operation.
#[derive(Debug, Clone, Default)]
pub struct PopulateMetrics {
    /// Number of records written.
    pub records_written: u64,
    /// Number of metric values written (records times catalog size).
    pub values_written: u64,
    /// Number of batches moved through the queue.
    pub batches_written: u64,
    /// Bytes written to the destination.
    pub bytes_written: u64,
    /// Largest queue length observed by the consumer.
    pub max_queue_depth: usize,
    /// Total time taken.
    pub total_duration: Duration,
}

impl PopulateMetrics {
    fn from_pipeline(metrics: PipelineMetrics, fields: usize) -> Self {
        Self {
            records_written: metrics.records_written,
            values_written: metrics.records_written * fields as u64,
            batches_written: metrics.batches_written,
            bytes_written: metrics.bytes_written,
            max_queue_depth: metrics.max_queue_depth,
            total_duration: metrics.total_duration,
        }
    }

    /// Calculate records per second.
    pub fn records_per_second(&self) -> f64 {
        self.per_second(self.records_written)
    }

    /// Calculate metric values per second.
    pub fn values_per_second(&self) -> f64 {
        self.per_second(self.values_written)
    }

    /// Calculate bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        self.per_second(self.bytes_written)
    }

    fn per_second(&self, count: u64) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            count as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Populator that streams a generated dataset into a file or stdout.
#[derive(Debug)]
pub struct FilePopulator {
    schema: DatasetSchema,
    seed: i64,
    user_type: u32,
    encoding: EncodingMode,
    metric: String,
    separator: char,
    pipeline_config: PipelineConfig,
    cancel: Option<CancellationToken>,
}

impl FilePopulator {
    /// Create a new file populator.
    ///
    /// # Arguments
    ///
    /// * `schema` - Dataset description
    /// * `seed` - Random seed for deterministic generation
    ///
    /// # Example
    ///
    /// ```ignore
    /// let populator = FilePopulator::new(schema, 42)
    ///     .with_encoding(EncodingMode::BinaryFramed);
    /// let metrics = populator.populate("/tmp/points.bin").await?;
    /// ```
    pub fn new(schema: DatasetSchema, seed: i64) -> Self {
        let metric = schema.metric.clone();
        Self {
            schema,
            seed,
            user_type: 0,
            encoding: EncodingMode::Text,
            metric,
            separator: DEFAULT_SEPARATOR,
            pipeline_config: PipelineConfig::default(),
            cancel: None,
        }
    }

    pub fn with_user_type(mut self, user_type: u32) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn with_encoding(mut self, encoding: EncodingMode) -> Self {
        self.encoding = encoding;
        self
    }

    /// Override the dataset's metric name.
    pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = metric.into();
        self
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_pipeline_config(mut self, config: PipelineConfig) -> Self {
        self.pipeline_config = config;
        self
    }

    /// Cancel the run when `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Get a reference to the dataset description.
    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    pub fn encoding(&self) -> EncodingMode {
        self.encoding
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn pipeline_config(&self) -> &PipelineConfig {
        &self.pipeline_config
    }

    /// Build a fresh generator for this populator's settings.
    pub fn build_generator(&self) -> Result<RecordGenerator, FilePopulatorError> {
        let descriptor = self.schema.descriptor()?;
        let catalog = self.schema.field_catalog()?;
        let encoder = Encoder::for_mode(self.encoding, self.metric.clone(), self.separator)?;

        Ok(RecordGenerator::new(
            Arc::new(descriptor),
            Arc::new(self.schema.lookup_tables().clone()),
            catalog,
            self.seed,
        )
        .with_user_type(self.user_type)
        .with_encoder(encoder))
    }

    /// Generate the dataset into `output_path`, replacing any existing file.
    pub async fn populate<P: AsRef<Path>>(
        &self,
        output_path: P,
    ) -> Result<PopulateMetrics, FilePopulatorError> {
        let output_path = output_path.as_ref();
        info!(
            "Generating {} file '{}' with {} records",
            self.encoding,
            output_path.display(),
            self.schema.total_records()
        );

        // Settle every setting before the destination is truncated.
        let generator = self.build_generator()?;
        let mut sink = FileSink::create(output_path, self.encoding.record_terminator())?;
        let metrics = self.stream(generator, &mut sink).await?;

        info!(
            "File generation complete: {} records, {} bytes in {:?} ({:.2} records/sec)",
            metrics.records_written,
            metrics.bytes_written,
            metrics.total_duration,
            metrics.records_per_second()
        );

        Ok(metrics)
    }

    /// Generate the dataset to standard output.
    pub async fn populate_stdout(&self) -> Result<PopulateMetrics, FilePopulatorError> {
        info!(
            "Generating {} records to stdout ({})",
            self.schema.total_records(),
            self.encoding
        );

        let generator = self.build_generator()?;
        let writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, io::stdout());
        let mut sink = WriterSink::new(writer, self.encoding.record_terminator());
        self.stream(generator, &mut sink).await
    }

    /// Generate the dataset into an arbitrary sink.
    pub async fn populate_into<S: Sink + ?Sized>(
        &self,
        sink: &mut S,
    ) -> Result<PopulateMetrics, FilePopulatorError> {
        let generator = self.build_generator()?;
        self.stream(generator, sink).await
    }

    async fn stream<S: Sink + ?Sized>(
        &self,
        generator: RecordGenerator,
        sink: &mut S,
    ) -> Result<PopulateMetrics, FilePopulatorError> {
        let fields = generator.catalog().len();

        let mut pipeline = StreamingPipeline::new(self.pipeline_config);
        if let Some(token) = &self.cancel {
            pipeline = pipeline.with_cancellation_token(token.clone());
        }

        let metrics = pipeline.run(generator, sink).await?;
        Ok(PopulateMetrics::from_pipeline(metrics, fields))
    }
}
