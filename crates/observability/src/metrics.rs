//! Detection metric collection.
//!
//! Prometheus-facing record helpers plus an in-memory aggregator used for
//! the end-of-run summary.

use contracts::{DeviceState, MotionEvent};
use metrics::{counter, gauge, histogram};

/// Record one confirmed event
///
/// Call for every event returned by a detection tick.
pub fn record_event_confirmed(event: &MotionEvent) {
    counter!("tiltwatch_events_total", "kind" => event.kind()).increment(1);
    gauge!("tiltwatch_last_event_start_ms").set(event.start_time_ms() as f64);
}

/// Record a sample delivered to the engine
pub fn record_sample_received(source_id: &str) {
    counter!(
        "tiltwatch_engine_samples_total",
        "source_id" => source_id.to_string()
    )
    .increment(1);
}

/// Record the current device state
pub fn record_device_state(state: DeviceState) {
    gauge!("tiltwatch_device_state", "state" => state.as_str()).set(1.0);
    for other in [
        DeviceState::Stopped,
        DeviceState::Moving,
        DeviceState::Tipped,
        DeviceState::Tamper,
    ] {
        if other != state {
            gauge!("tiltwatch_device_state", "state" => other.as_str()).set(0.0);
        }
    }
}

/// Record time spent inside one detection tick
pub fn record_tick_latency_ms(latency_ms: f64) {
    histogram!("tiltwatch_tick_latency_ms").record(latency_ms);
}

/// Record the ingestion queue depth
pub fn record_queue_depth(depth: usize) {
    gauge!("tiltwatch_ingest_queue_depth").set(depth as f64);
}

/// Detection metrics aggregator
///
/// Aggregates in memory for statistics and summary output.
#[derive(Debug, Clone, Default)]
pub struct DetectionMetricsAggregator {
    /// Samples pushed through the engine
    pub total_samples: u64,

    /// Confirmed events per kind
    pub tipping_events: u64,
    pub movement_events: u64,
    pub stop_events: u64,
    pub tamper_events: u64,

    /// Device state transitions observed
    pub state_transitions: u64,

    /// Last device state seen
    last_state: Option<DeviceState>,

    /// Tick latency statistics (milliseconds)
    pub tick_latency_ms: RunningStats,
}

impl DetectionMetricsAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one processed sample and its tick latency
    pub fn record_tick(&mut self, latency_ms: f64) {
        self.total_samples += 1;
        self.tick_latency_ms.push(latency_ms);
    }

    /// Record a confirmed event
    pub fn record_event(&mut self, event: &MotionEvent) {
        match event {
            MotionEvent::Tipping(_) => self.tipping_events += 1,
            MotionEvent::Movement(_) => self.movement_events += 1,
            MotionEvent::Stop(_) => self.stop_events += 1,
            MotionEvent::Tamper(_) => self.tamper_events += 1,
        }
    }

    /// Record the post-tick device state, counting transitions
    pub fn record_state(&mut self, state: DeviceState) {
        if let Some(last) = self.last_state {
            if last != state {
                self.state_transitions += 1;
            }
        }
        self.last_state = Some(state);
    }

    /// Total confirmed events of all kinds
    pub fn total_events(&self) -> u64 {
        self.tipping_events + self.movement_events + self.stop_events + self.tamper_events
    }

    /// Produce a summary report
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_samples: self.total_samples,
            tipping_events: self.tipping_events,
            movement_events: self.movement_events,
            stop_events: self.stop_events,
            tamper_events: self.tamper_events,
            state_transitions: self.state_transitions,
            final_state: self.last_state.unwrap_or_default(),
            tick_latency_ms: StatsSummary::from(&self.tick_latency_ms),
        }
    }

    /// Reset statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_samples: u64,
    pub tipping_events: u64,
    pub movement_events: u64,
    pub stop_events: u64,
    pub tamper_events: u64,
    pub state_transitions: u64,
    pub final_state: DeviceState,
    pub tick_latency_ms: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Detection Metrics Summary ===")?;
        writeln!(f, "Samples processed: {}", self.total_samples)?;
        writeln!(f, "Tipping events: {}", self.tipping_events)?;
        writeln!(f, "Movement events: {}", self.movement_events)?;
        writeln!(f, "Stop events: {}", self.stop_events)?;
        writeln!(f, "Tamper events: {}", self.tamper_events)?;
        writeln!(f, "State transitions: {}", self.state_transitions)?;
        writeln!(f, "Final state: {}", self.final_state)?;
        writeln!(f, "Tick latency (ms): {}", self.tick_latency_ms)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics calculator (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a new value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Sample count
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum
    pub fn max(&self) -> f64 {
        self.max
    }
}
