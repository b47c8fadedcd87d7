//! Pipeline statistics and metrics.

use std::time::Duration;

use observability::DetectionMetricsAggregator;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Total samples pushed through the engine
    pub samples_processed: u64,

    /// Samples skipped by the sample-period gate
    pub samples_skipped: u64,

    /// Total confirmed events dispatched
    pub events_confirmed: u64,

    /// Total duration of the pipeline run
    pub duration: Duration,

    /// Number of sinks that received events
    pub active_sinks: usize,

    /// Detection metrics aggregator
    pub detection_metrics: DetectionMetricsAggregator,
}

impl PipelineStats {
    /// Calculate samples per second throughput
    pub fn samples_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.samples_processed as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Pipeline Statistics ===\n");

        println!("Overview");
        println!("   |- Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   |- Samples processed: {}", self.samples_processed);
        println!("   |- Samples skipped: {}", self.samples_skipped);
        println!("   |- Samples/s: {:.2}", self.samples_per_second());
        println!("   |- Events confirmed: {}", self.events_confirmed);
        println!("   `- Active sinks: {}", self.active_sinks);

        println!("\n{}", self.detection_metrics.summary());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throughput_handles_zero_duration() {
        let stats = PipelineStats::default();
        assert_eq!(stats.samples_per_second(), 0.0);
    }

    #[test]
    fn throughput_computes() {
        let stats = PipelineStats {
            samples_processed: 100,
            duration: Duration::from_secs(10),
            ..Default::default()
        };
        assert!((stats.samples_per_second() - 10.0).abs() < 1e-9);
    }
}
