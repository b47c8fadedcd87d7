//! Ingestion Pipeline main entry

use std::collections::HashMap;
use std::sync::Arc;

use async_channel::{bounded, Receiver, Sender};
use contracts::{AxisSample, SampleSource};
use tracing::{debug, info, instrument};

use crate::adapter::{CallbackSourceAdapter, SourceAdapter};
use crate::config::{BackpressureConfig, IngestionMetrics};

/// Ingestion Pipeline
///
/// Manages registered source adapters and provides one unified sample
/// stream. In the common single-IMU deployment it holds exactly one
/// adapter, but nothing in the plumbing assumes that.
pub struct IngestionPipeline {
    /// Registered adapters
    adapters: HashMap<String, Box<dyn SourceAdapter>>,

    /// Shared metrics
    metrics: Arc<IngestionMetrics>,

    /// Sample sender (shared by all adapters)
    tx: Sender<AxisSample>,

    /// Sample receiver
    rx: Option<Receiver<AxisSample>>,

    /// Default backpressure configuration
    default_config: BackpressureConfig,
}

impl IngestionPipeline {
    /// Create new Ingestion Pipeline
    ///
    /// # Arguments
    /// * `channel_capacity` - Channel capacity
    pub fn new(channel_capacity: usize) -> Self {
        let (tx, rx) = bounded(channel_capacity);

        Self {
            adapters: HashMap::new(),
            metrics: Arc::new(IngestionMetrics::new()),
            tx,
            rx: Some(rx),
            default_config: BackpressureConfig {
                channel_capacity,
                ..Default::default()
            },
        }
    }

    /// Create with custom backpressure configuration
    pub fn with_config(config: BackpressureConfig) -> Self {
        let (tx, rx) = bounded(config.channel_capacity);

        Self {
            adapters: HashMap::new(),
            metrics: Arc::new(IngestionMetrics::new()),
            tx,
            rx: Some(rx),
            default_config: config,
        }
    }

    /// Register a sample source
    ///
    /// # Arguments
    /// * `source_id` - Source configuration ID
    /// * `source` - Data source implementing `SampleSource`
    /// * `config` - Optional backpressure configuration override
    #[instrument(
        name = "ingestion_register_source",
        skip(self, source, config),
        fields(source_id = %source_id)
    )]
    pub fn register_source(
        &mut self,
        source_id: String,
        source: Box<dyn SampleSource>,
        config: Option<BackpressureConfig>,
    ) {
        let adapter = CallbackSourceAdapter::new(
            source_id.clone(),
            source,
            config.unwrap_or_else(|| self.default_config.clone()),
        );
        debug!(source_id = %source_id, "registered sample source");
        self.adapters.insert(source_id, Box::new(adapter));
    }

    /// Start all registered sources
    #[instrument(name = "ingestion_start_all", skip(self))]
    pub fn start_all(&self) {
        info!(count = self.adapters.len(), "starting all source adapters");
        for (source_id, adapter) in &self.adapters {
            if !adapter.is_listening() {
                debug!(source_id = %source_id, "starting adapter");
                adapter.start(self.tx.clone(), self.metrics.clone());
            }
        }
    }

    /// Stop all sources
    #[instrument(name = "ingestion_stop_all", skip(self))]
    pub fn stop_all(&self) {
        info!(count = self.adapters.len(), "stopping all source adapters");
        for (source_id, adapter) in &self.adapters {
            if adapter.is_listening() {
                debug!(source_id = %source_id, "stopping adapter");
                adapter.stop();
            }
        }
    }

    /// Get the sample stream receiver
    ///
    /// Note: Can only be called once, subsequent calls return None
    pub fn take_receiver(&mut self) -> Option<Receiver<AxisSample>> {
        self.rx.take()
    }

    /// Get metrics reference
    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        self.metrics.clone()
    }

    /// Get registered source count
    pub fn source_count(&self) -> usize {
        self.adapters.len()
    }

    /// Check if specified source is listening
    pub fn is_source_listening(&self, source_id: &str) -> bool {
        self.adapters
            .get(source_id)
            .map(|a| a.is_listening())
            .unwrap_or(false)
    }
}

impl Drop for IngestionPipeline {
    fn drop(&mut self) {
        self.stop_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::MotionProfile;
    use source_factory::{MockImuConfig, MockImuSource};
    use std::time::Duration;

    fn mock_source(profile: MotionProfile) -> Box<dyn SampleSource> {
        Box::new(MockImuSource::new(
            "imu".to_string(),
            MockImuConfig {
                frequency_hz: 200.0,
                profile,
                offsets: Default::default(),
            },
        ))
    }

    #[test]
    fn pipeline_creation() {
        let pipeline = IngestionPipeline::new(100);
        assert_eq!(pipeline.source_count(), 0);
    }

    #[test]
    fn take_receiver_once() {
        let mut pipeline = IngestionPipeline::new(100);
        assert!(pipeline.take_receiver().is_some());
        assert!(pipeline.take_receiver().is_none());
    }

    #[test]
    fn start_stop_round_trip() {
        let mut pipeline = IngestionPipeline::new(100);
        pipeline.register_source("imu".to_string(), mock_source(MotionProfile::Stationary), None);
        let rx = pipeline.take_receiver().unwrap();

        pipeline.start_all();
        assert!(pipeline.is_source_listening("imu"));

        let sample = rx
            .recv_blocking()
            .expect("mock source should deliver samples");
        assert!(sample.temperature.is_some());

        pipeline.stop_all();
        assert!(!pipeline.is_source_listening("imu"));

        // After the producer is gone the queue drains to empty
        std::thread::sleep(Duration::from_millis(20));
        while rx.try_recv().is_ok() {}
        assert!(rx.is_empty());
    }
}
