//! AxisSample - Sample source output
//!
//! One fused IMU reading: accelerometer, gyroscope and orientation angles.

use serde::{Deserialize, Serialize};

/// 3D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// Create a new vector
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One IMU reading
///
/// Produced by a sample source; immutable once constructed. A zeroed
/// sample (`AxisSample::default()`) doubles as the "no data yet" value
/// returned by queries against an empty history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisSample {
    /// Monotonic timestamp of the reading (milliseconds)
    pub time_ms: u64,

    /// Accelerometer axes (g)
    pub acc: Vector3,

    /// Gyroscope axes (deg/s)
    pub gyro: Vector3,

    /// Yaw angle (degrees)
    pub yaw: f64,

    /// Pitch angle (degrees)
    pub pitch: f64,

    /// Roll angle (degrees)
    pub roll: f64,

    /// Sensor temperature (°C), if the source reports one
    pub temperature: Option<f64>,
}

/// Accelerometer/gyroscope offsets, as produced by a calibration pass
///
/// Raw register units of the underlying part; the engine never
/// interprets them, they only round-trip between source and operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImuOffsets {
    pub acc_x: i16,
    pub acc_y: i16,
    pub acc_z: i16,
    pub gyro_x: i16,
    pub gyro_y: i16,
    pub gyro_z: i16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sample_is_zeroed() {
        let sample = AxisSample::default();
        assert_eq!(sample.time_ms, 0);
        assert_eq!(sample.acc, Vector3::default());
        assert_eq!(sample.roll, 0.0);
        assert!(sample.temperature.is_none());
    }

    #[test]
    fn sample_serde_round_trip() {
        let sample = AxisSample {
            time_ms: 1200,
            acc: Vector3::new(0.01, -0.02, 0.98),
            gyro: Vector3::new(0.4, 0.1, -0.2),
            yaw: 12.0,
            pitch: -3.5,
            roll: 1.25,
            temperature: Some(36.1),
        };

        let json = serde_json::to_string(&sample).unwrap();
        let parsed: AxisSample = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample);
    }
}
