//! Pipeline orchestrator - coordinates all components.
//!
//! Wires the configured sample source through ingestion into the
//! detection engine and fans confirmed events out to the dispatcher.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::{MotionEvent, WatchBlueprint};
use detection_engine::MotionMonitor;
use ingestion::{BackpressureConfig, IngestionPipeline};
use observability::{record_device_state, record_event_confirmed, record_tick_latency_ms};
use source_factory::SourceFactory;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The unit blueprint configuration
    pub blueprint: WatchBlueprint,

    /// Maximum number of samples to process (None = unlimited)
    pub max_samples: Option<u64>,

    /// Pipeline timeout (None = no timeout)
    pub timeout: Option<Duration>,

    /// Channel buffer size
    pub buffer_size: usize,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Build the sample source
        info!(source_id = %blueprint.source.id, "Building sample source...");
        let source =
            SourceFactory::from_blueprint(blueprint).context("Failed to build sample source")?;

        // Setup Ingestion Pipeline
        info!("Setting up ingestion pipeline...");
        let mut ingestion = IngestionPipeline::with_config(BackpressureConfig::new(
            self.config.buffer_size,
            blueprint.ingest.drop_policy,
        ));
        ingestion.register_source(blueprint.source.id.clone(), source, None);

        // Setup Detection Engine
        info!("Configuring detection engine...");
        let monitor = MotionMonitor::with_settings(blueprint.detection);
        if !monitor.check_configurations() {
            warn!("No detector configured - samples will be recorded but never classified");
        }

        // Setup Dispatcher
        info!("Setting up dispatcher...");
        let (event_tx, event_rx) = mpsc::channel::<MotionEvent>(self.config.buffer_size);

        if blueprint.sinks.is_empty() {
            warn!("No sinks configured - confirmed events will only reach observers");
        }

        let dispatcher = dispatcher::create_dispatcher(blueprint.sinks.clone(), event_rx)
            .context("Failed to create dispatcher")?;

        let active_sinks = blueprint.sinks.len();
        let dispatcher_handle = dispatcher.spawn();

        info!(active_sinks, "Dispatcher started");

        // Start Pipeline
        info!("Starting sample ingestion...");
        ingestion.start_all();
        let ingestion_rx = ingestion
            .take_receiver()
            .context("Failed to get ingestion receiver")?;

        let max_samples = self.config.max_samples;
        let sample_period_ms = blueprint.device.sample_period_ms;
        let monitor_clone = monitor.clone();

        info!(max_samples = ?max_samples, "Pipeline running");

        // Pipeline processing task
        let pipeline_task = async move {
            let mut stats = PipelineStats {
                active_sinks,
                ..Default::default()
            };
            let mut last_accepted_ms: Option<u64> = None;

            while let Ok(sample) = ingestion_rx.recv().await {
                // Honor the configured sampling cadence: readings that
                // arrive faster than sample_period_ms are not pushed.
                if let Some(last) = last_accepted_ms {
                    if sample.time_ms.saturating_sub(last) < sample_period_ms {
                        stats.samples_skipped += 1;
                        continue;
                    }
                }
                last_accepted_ms = Some(sample.time_ms);

                let tick_start = Instant::now();
                let events = monitor_clone.add_measurement(sample);
                let latency_ms = tick_start.elapsed().as_secs_f64() * 1000.0;

                stats.samples_processed += 1;
                stats.detection_metrics.record_tick(latency_ms);
                record_tick_latency_ms(latency_ms);

                let state = monitor_clone.device_state();
                stats.detection_metrics.record_state(state);
                record_device_state(state);

                for event in events {
                    stats.events_confirmed += 1;
                    stats.detection_metrics.record_event(&event);
                    record_event_confirmed(&event);

                    info!(
                        kind = event.kind(),
                        start_time_ms = event.start_time_ms(),
                        state = %state,
                        "Event confirmed"
                    );

                    if event_tx.send(event).await.is_err() {
                        warn!("Dispatcher channel closed");
                        return stats;
                    }
                }

                // Check max samples limit
                if let Some(max) = max_samples {
                    if stats.samples_processed >= max {
                        info!(samples = stats.samples_processed, "Reached max samples limit");
                        break;
                    }
                }
            }

            stats
        };

        // Run with optional timeout
        let stats = if let Some(timeout) = self.config.timeout {
            match tokio::time::timeout(timeout, pipeline_task).await {
                Ok(stats) => stats,
                Err(_) => {
                    warn!(timeout_secs = timeout.as_secs(), "Pipeline timed out");
                    PipelineStats::default()
                }
            }
        } else {
            pipeline_task.await
        };

        // Shutdown
        info!("Shutting down pipeline...");
        ingestion.stop_all();

        // Stopping the producer clears the engine history
        monitor.reset_measurements();

        // Wait for dispatcher to flush; the event sender died with the
        // pipeline task, closing the dispatcher input
        let _ = tokio::time::timeout(Duration::from_secs(5), dispatcher_handle).await;

        let mut final_stats = stats;
        final_stats.duration = start_time.elapsed();

        info!(
            duration_secs = final_stats.duration.as_secs_f64(),
            sps = format!("{:.2}", final_stats.samples_per_second()),
            "Pipeline shutdown complete"
        );

        Ok(final_stats)
    }
}
