//! Detector settings shared across crates.
//!
//! Every settings struct is replaced wholesale by a `configure_*` call;
//! an all-zero struct (the `Default`) means the detector is unconfigured
//! and never confirms.

use serde::{Deserialize, Serialize};

/// Tipping detector settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TippingSettings {
    /// Consecutive qualifying samples required to confirm a tip
    #[serde(default)]
    pub minimum_samples: u16,

    /// Pitch threshold in degrees bounding the qualifying region
    #[serde(default)]
    pub start_threshold_deg: f64,
}

/// Movement detector settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementSettings {
    /// Consecutive qualifying samples required to confirm movement
    #[serde(default)]
    pub minimum_samples: u16,

    /// Band around 1 g the acceleration magnitude must leave:
    /// `‖acc‖ < 1 - interval || ‖acc‖ > 1 + interval`
    #[serde(default)]
    pub interval_g: f64,
}

/// Stop detector settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StopSettings {
    /// Consecutive qualifying samples required to confirm a stop
    #[serde(default)]
    pub minimum_samples: u16,

    /// Band around 1 g the acceleration magnitude must stay inside:
    /// `1 - interval < ‖acc‖ < 1 + interval`
    #[serde(default)]
    pub interval_g: f64,
}

/// Tamper detector settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TamperSettings {
    /// Consecutive qualifying samples required to confirm tamper
    #[serde(default)]
    pub minimum_samples: u16,

    /// A unit tipped over but still moving for longer than this many
    /// seconds escalates to tamper
    #[serde(default)]
    pub time_window_s: u64,
}

/// Aggregate of all four detector settings (blueprint `[detection]` tree)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionSettings {
    #[serde(default)]
    pub tipping: TippingSettings,

    #[serde(default)]
    pub movement: MovementSettings,

    #[serde(default)]
    pub stop: StopSettings,

    #[serde(default)]
    pub tamper: TamperSettings,
}

impl DetectionSettings {
    /// True iff at least one detector has a non-zero minimum-sample count.
    ///
    /// Detection ticks are skipped entirely while this is false.
    pub fn any_configured(&self) -> bool {
        self.tipping.minimum_samples != 0
            || self.movement.minimum_samples != 0
            || self.stop.minimum_samples != 0
            || self.tamper.minimum_samples != 0
    }
}
