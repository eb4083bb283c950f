//! Metrics from a pipeline run.

use std::time::Duration;

/// Counters gathered by the consumer side of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineMetrics {
    /// Number of records written to the sink.
    pub records_written: u64,
    /// Number of batches popped from the queue.
    pub batches_written: u64,
    /// Bytes written, terminators included.
    pub bytes_written: u64,
    /// Largest queue length seen right after popping a batch.
    pub max_queue_depth: usize,
    /// Wall time from start to drain.
    pub total_duration: Duration,
}

impl PipelineMetrics {
    /// Calculate records per second.
    pub fn records_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.records_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.bytes_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let metrics = PipelineMetrics {
            records_written: 1000,
            batches_written: 10,
            bytes_written: 100_000,
            max_queue_depth: 4,
            total_duration: Duration::from_secs(10),
        };

        assert_eq!(metrics.records_per_second(), 100.0);
        assert_eq!(metrics.bytes_per_second(), 10_000.0);
    }

    #[test]
    fn test_zero_duration() {
        let metrics = PipelineMetrics::default();
        assert_eq!(metrics.records_per_second(), 0.0);
        assert_eq!(metrics.bytes_per_second(), 0.0);
    }
}
