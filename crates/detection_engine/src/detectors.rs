//! Instantaneous threshold tests for the four detectors.
//!
//! A "qualifying" sample satisfies a detector's predicate irrespective of
//! streak length; debouncing and latching happen in the engine. Angles
//! are in degrees, acceleration in g, magnitude is the Euclidean norm.

use contracts::{AxisSample, MovementSettings, StopSettings, TippingSettings};

/// Euclidean norm of the acceleration vector (g)
#[inline]
pub fn acc_magnitude(sample: &AxisSample) -> f64 {
    (sample.acc.x.powi(2) + sample.acc.y.powi(2) + sample.acc.z.powi(2)).sqrt()
}

/// Tipping test: the unit is past its tipping point when either the roll
/// has left the upright band with pitch still inside the threshold, or
/// roll is nominal but pitch has swung past `180 - threshold`.
#[inline]
pub fn tipping_qualifies(sample: &AxisSample, settings: &TippingSettings) -> bool {
    if sample.roll.abs() > 90.0 {
        sample.pitch.abs() < settings.start_threshold_deg
    } else {
        sample.pitch.abs() > 180.0 - settings.start_threshold_deg
    }
}

/// Movement test: acceleration magnitude has left the 1 g band
#[inline]
pub fn movement_qualifies(sample: &AxisSample, settings: &MovementSettings) -> bool {
    let magnitude = acc_magnitude(sample);
    magnitude < 1.0 - settings.interval_g || magnitude > 1.0 + settings.interval_g
}

/// Stop test: acceleration magnitude stays strictly inside the 1 g band
#[inline]
pub fn stop_qualifies(sample: &AxisSample, settings: &StopSettings) -> bool {
    let magnitude = acc_magnitude(sample);
    magnitude > 1.0 - settings.interval_g && magnitude < 1.0 + settings.interval_g
}

/// Tamper test: gravity showing up dominantly on Z is inconsistent with
/// the expected mounting orientation
#[inline]
pub fn tamper_qualifies(sample: &AxisSample) -> bool {
    sample.acc.z.abs() > sample.acc.y.abs() && sample.acc.z.abs() > sample.acc.x.abs()
}
