//! MotionEvent - Detection Engine output
//!
//! Context frozen at the moment a detector confirms. Event data is
//! overwritten, not merged, on each new confirmation and read back
//! through copy-out accessors.

use serde::{Deserialize, Serialize};

use crate::{AxisSample, TippingSide};

/// Captured tipping confirmation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TippingEvent {
    /// Timestamp of the first qualifying sample in the confirming run
    pub start_time_ms: u64,

    /// Which side the unit went over
    pub side: TippingSide,

    /// Full history buffer at confirmation time, oldest first.
    /// Tipping only confirms against a full buffer, so this is a
    /// complete window of context samples.
    pub history: Vec<AxisSample>,
}

/// Captured movement confirmation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementEvent {
    /// Timestamp of the first qualifying sample in the confirming run
    pub start_time_ms: u64,
}

/// Captured stop confirmation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopEvent {
    /// Timestamp of the first qualifying sample in the confirming run
    pub start_time_ms: u64,
}

/// Captured tamper confirmation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TamperEvent {
    /// Timestamp of the first qualifying sample in the confirming run
    pub start_time_ms: u64,
}

/// A confirmed detection transition, as fanned out to observers and sinks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionEvent {
    Tipping(TippingEvent),
    Movement(MovementEvent),
    Stop(StopEvent),
    Tamper(TamperEvent),
}

impl MotionEvent {
    /// Stable lowercase name (used for logging and metric labels)
    pub fn kind(&self) -> &'static str {
        match self {
            MotionEvent::Tipping(_) => "tipping",
            MotionEvent::Movement(_) => "movement",
            MotionEvent::Stop(_) => "stop",
            MotionEvent::Tamper(_) => "tamper",
        }
    }

    /// Start timestamp of the confirming run
    pub fn start_time_ms(&self) -> u64 {
        match self {
            MotionEvent::Tipping(e) => e.start_time_ms,
            MotionEvent::Movement(e) => e.start_time_ms,
            MotionEvent::Stop(e) => e.start_time_ms,
            MotionEvent::Tamper(e) => e.start_time_ms,
        }
    }
}
