//! Mock IMU implementation
//!
//! Implements the `SampleSource` trait, generating synthetic fused
//! readings from a motion profile. Used for testing and development
//! without a physical sensor. Data is delivered through the callback,
//! consistent with how a hardware driver surfaces sample-ready events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use contracts::{
    AxisSample, ContractError, ImuOffsets, MotionProfile, SampleCallback, SampleSource, Vector3,
};
use rand::Rng;
use tracing::{debug, trace};

/// Mock IMU configuration
#[derive(Debug, Clone)]
pub struct MockImuConfig {
    /// Sample frequency (Hz)
    pub frequency_hz: f64,

    /// Motion profile the synthetic readings follow
    pub profile: MotionProfile,

    /// Offsets reported by `calibrate()`
    pub offsets: ImuOffsets,
}

impl Default for MockImuConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 5.0,
            profile: MotionProfile::Stationary,
            offsets: ImuOffsets::default(),
        }
    }
}

/// Mock IMU source
///
/// Generates profile-shaped samples at the configured frequency in a
/// background thread. `stop` joins the thread before returning.
pub struct MockImuSource {
    source_id: String,
    config: MockImuConfig,
    listening: Arc<AtomicBool>,
    thread_handle: Mutex<Option<JoinHandle<()>>>,
}

impl MockImuSource {
    /// Create a new mock IMU
    pub fn new(source_id: String, config: MockImuConfig) -> Self {
        Self {
            source_id,
            config,
            listening: Arc::new(AtomicBool::new(false)),
            thread_handle: Mutex::new(None),
        }
    }

    /// Create a mock IMU with default configuration
    pub fn with_defaults(source_id: String) -> Self {
        Self::new(source_id, MockImuConfig::default())
    }

    /// Generate one synthetic reading for the given profile
    fn generate_sample(profile: MotionProfile, time_ms: u64) -> AxisSample {
        let mut rng = rand::rng();
        let mut jitter = |scale: f64| rng.random_range(-scale..scale);

        let (acc, roll, pitch) = match profile {
            MotionProfile::Stationary => (
                Vector3::new(jitter(0.005), 1.0 + jitter(0.005), jitter(0.005)),
                jitter(1.0),
                jitter(1.0),
            ),
            MotionProfile::Driving => (
                // Magnitude well outside a ±0.04 g band around 1 g
                Vector3::new(0.3 + jitter(0.05), 1.0 + jitter(0.02), jitter(0.02)),
                jitter(3.0),
                jitter(3.0),
            ),
            MotionProfile::TippedLeft => (
                Vector3::new(jitter(0.01), 1.0 + jitter(0.01), jitter(0.01)),
                120.0 + jitter(5.0),
                50.0 + jitter(5.0),
            ),
            MotionProfile::TippedRight => (
                Vector3::new(jitter(0.01), 1.0 + jitter(0.01), jitter(0.01)),
                -120.0 + jitter(5.0),
                -50.0 + jitter(5.0),
            ),
            MotionProfile::Shaken => (
                // Z-dominant and out of the 1 g band
                Vector3::new(0.1 + jitter(0.02), 0.2 + jitter(0.02), 1.2 + jitter(0.1)),
                jitter(10.0),
                jitter(10.0),
            ),
        };

        AxisSample {
            time_ms,
            acc,
            gyro: Vector3::new(jitter(0.5), jitter(0.5), jitter(0.5)),
            yaw: jitter(5.0),
            pitch,
            roll,
            temperature: Some(25.0 + jitter(0.5)),
        }
    }
}

impl SampleSource for MockImuSource {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn listen(&self, callback: SampleCallback) {
        // Idempotent: if already listening, don't start again
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }

        let source_id = self.source_id.clone();
        let profile = self.config.profile;
        let listening = self.listening.clone();
        let interval = Duration::from_secs_f64(1.0 / self.config.frequency_hz);

        let handle = thread::spawn(move || {
            let start_time = Instant::now();

            debug!(
                source_id = %source_id,
                profile = ?profile,
                interval_ms = interval.as_millis() as u64,
                "mock imu started"
            );

            while listening.load(Ordering::Relaxed) {
                let time_ms = start_time.elapsed().as_millis() as u64;
                let sample = MockImuSource::generate_sample(profile, time_ms);

                callback(sample);
                trace!(source_id = %source_id, time_ms, "mock sample sent");

                thread::sleep(interval);
            }

            debug!(source_id = %source_id, "mock imu stopped");
        });

        *self.thread_handle.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
    }

    fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);

        if let Some(handle) = self
            .thread_handle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            let _ = handle.join();
        }
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }

    fn calibrate(&self) -> Result<ImuOffsets, ContractError> {
        // No physical sensor: report the configured offsets unchanged
        Ok(self.config.offsets)
    }
}
