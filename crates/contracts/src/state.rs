//! DeviceState - the single externally visible classification
//!
//! Exactly one state holds at any time; recomputed on every detection tick.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authoritative classification of the monitored unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceState {
    /// At rest, upright
    #[default]
    Stopped,

    /// In motion, upright
    Moving,

    /// Tipped over, not moving
    Tipped,

    /// Tampered with (direct detection or tipped-while-moving escalation)
    Tamper,
}

impl DeviceState {
    /// Stable lowercase name (used for logging and metric labels)
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceState::Stopped => "stopped",
            DeviceState::Moving => "moving",
            DeviceState::Tipped => "tipped",
            DeviceState::Tamper => "tamper",
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side the unit tipped towards, derived from pitch sign at confirmation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TippingSide {
    #[default]
    Left,
    Right,
}

impl fmt::Display for TippingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TippingSide::Left => f.write_str("left"),
            TippingSide::Right => f.write_str("right"),
        }
    }
}
