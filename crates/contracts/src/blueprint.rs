//! WatchBlueprint - Config Loader output
//!
//! Describes a complete unit configuration: device identity, sample
//! source, detector thresholds and output routing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::{DetectionSettings, ImuOffsets};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete unit configuration blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Device identity and sampling cadence
    pub device: DeviceConfig,

    /// Sample source selection
    #[serde(default)]
    pub source: SourceSpec,

    /// Detector thresholds (all-zero sections leave a detector
    /// unconfigured)
    #[serde(default)]
    pub detection: DetectionSettings,

    /// Ingestion backpressure tuning
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Output routing configuration
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

/// Device identity and sampling cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Unit identifier (e.g., "unit-042")
    pub id: String,

    /// Minimum interval between history pushes (milliseconds)
    #[serde(default = "default_sample_period_ms")]
    pub sample_period_ms: u64,
}

fn default_sample_period_ms() -> u64 {
    200
}

/// Sample source selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Source identifier
    #[serde(default = "default_source_id")]
    pub id: String,

    /// Which implementation to construct
    #[serde(default)]
    pub kind: SourceKind,

    /// Sampling frequency for generated sources (Hz), must be > 0
    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: f64,

    /// Motion profile for the mock source
    #[serde(default)]
    pub profile: MotionProfile,

    /// Replay settings (replay kind only)
    #[serde(default)]
    pub replay: ReplaySpec,

    /// Offsets reported back by `calibrate()` on sources without a
    /// physical sensor
    #[serde(default)]
    pub offsets: ImuOffsets,
}

fn default_source_id() -> String {
    "imu".to_string()
}

fn default_frequency_hz() -> f64 {
    5.0
}

impl Default for SourceSpec {
    fn default() -> Self {
        Self {
            id: default_source_id(),
            kind: SourceKind::Mock,
            frequency_hz: default_frequency_hz(),
            profile: MotionProfile::Stationary,
            replay: ReplaySpec::default(),
            offsets: ImuOffsets::default(),
        }
    }
}

/// Sample source kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Synthetic samples from a motion profile
    #[default]
    Mock,
    /// Recorded samples from a JSONL log
    Replay,
}

/// Synthetic motion profile for the mock source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionProfile {
    /// Upright and at rest (‖acc‖ ≈ 1 g on Y)
    #[default]
    Stationary,
    /// Upright with acceleration spikes leaving the 1 g band
    Driving,
    /// Rolled past 90° with positive pitch
    TippedLeft,
    /// Rolled past 90° with negative pitch
    TippedRight,
    /// Z-dominant acceleration, inconsistent with the mounting
    Shaken,
}

/// Replay playback settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaySpec {
    /// JSONL sample log to play back
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Playback speed multiplier (1.0 = original pacing)
    #[serde(default = "default_speed_multiplier")]
    pub speed_multiplier: f64,

    /// Restart from the beginning when the log is exhausted
    #[serde(default)]
    pub loop_playback: bool,
}

fn default_speed_multiplier() -> f64 {
    1.0
}

impl Default for ReplaySpec {
    fn default() -> Self {
        Self {
            path: None,
            speed_multiplier: default_speed_multiplier(),
            loop_playback: false,
        }
    }
}

/// Ingestion backpressure tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Bounded channel capacity between sources and the engine loop
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Drop policy when the channel is full
    #[serde(default)]
    pub drop_policy: DropPolicy,
}

fn default_channel_capacity() -> usize {
    100
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            drop_policy: DropPolicy::default(),
        }
    }
}

/// Drop policy when backpressure saturates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPolicy {
    /// Drop the oldest queued sample
    #[default]
    DropOldest,
    /// Drop the incoming sample
    DropNewest,
}

/// Sink output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Queue capacity
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_queue_capacity() -> usize {
    100
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Log output
    Log,
    /// JSONL file output
    File,
}
