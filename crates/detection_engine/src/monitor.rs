//! Lock-guarded shared engine state.
//!
//! `MotionMonitor` is the concurrency boundary between the sampling
//! producer and query contexts: every externally visible getter and every
//! mutator of shared state acquires one exclusive lock for the duration
//! of the operation. Critical sections never block on I/O; observers are
//! notified only after the engine lock is released (no nested locking).
//!
//! A poisoned lock is the degraded "not ready" mode: getters answer with
//! defaults, mutators become no-ops, and nothing panics. The sampling
//! loop must never be halted by a query-side failure.

use std::sync::{Arc, Mutex, MutexGuard};

use contracts::{
    AxisSample, DetectionSettings, DeviceState, MotionEvent, MovementEvent, MovementSettings,
    StopEvent, StopSettings, TamperEvent, TamperSettings, TippingEvent, TippingSettings,
};
use tracing::warn;

use crate::engine::DetectionEngine;
use crate::observer::{MotionObserver, ObserverId, ObserverRegistry};

/// Thread-safe handle to the detection engine
///
/// Cheap to clone; all clones share the same engine and observer
/// registry.
#[derive(Clone)]
pub struct MotionMonitor {
    engine: Arc<Mutex<DetectionEngine>>,
    observers: Arc<Mutex<ObserverRegistry>>,
}

impl MotionMonitor {
    /// Create a monitor around an unconfigured engine
    pub fn new() -> Self {
        Self {
            engine: Arc::new(Mutex::new(DetectionEngine::new())),
            observers: Arc::new(Mutex::new(ObserverRegistry::new())),
        }
    }

    /// Create a monitor with all four detectors configured
    pub fn with_settings(settings: DetectionSettings) -> Self {
        Self {
            engine: Arc::new(Mutex::new(DetectionEngine::with_settings(settings))),
            observers: Arc::new(Mutex::new(ObserverRegistry::new())),
        }
    }

    fn engine(&self) -> Option<MutexGuard<'_, DetectionEngine>> {
        match self.engine.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                warn!("engine lock poisoned, operating degraded");
                None
            }
        }
    }

    /// Ingest one sample: push, run a detection tick, notify observers.
    ///
    /// Returns the confirmed transitions. Degrades to an empty result
    /// when the shared state is unavailable.
    pub fn add_measurement(&self, sample: AxisSample) -> Vec<MotionEvent> {
        let events = match self.engine() {
            Some(mut engine) => engine.push(sample),
            None => return Vec::new(),
        };

        if !events.is_empty() {
            self.notify(&events);
        }
        events
    }

    fn notify(&self, events: &[MotionEvent]) {
        match self.observers.lock() {
            Ok(mut registry) => {
                for event in events {
                    registry.notify(event);
                }
            }
            Err(_) => warn!("observer registry lock poisoned, notifications dropped"),
        }
    }

    /// Register a subscriber; `None` when the registry is unavailable
    pub fn attach(&self, observer: Box<dyn MotionObserver>) -> Option<ObserverId> {
        match self.observers.lock() {
            Ok(mut registry) => Some(registry.attach(observer)),
            Err(_) => {
                warn!("observer registry lock poisoned, attach ignored");
                None
            }
        }
    }

    /// Remove a subscriber by handle; false if unknown or unavailable
    pub fn detach(&self, id: ObserverId) -> bool {
        match self.observers.lock() {
            Ok(mut registry) => registry.detach(id),
            Err(_) => false,
        }
    }

    /// Replace the tipping settings, effective on the next tick
    pub fn configure_tipping(&self, settings: TippingSettings) {
        if let Some(mut engine) = self.engine() {
            engine.configure_tipping(settings);
        }
    }

    /// Replace the movement settings, effective on the next tick
    pub fn configure_movement(&self, settings: MovementSettings) {
        if let Some(mut engine) = self.engine() {
            engine.configure_movement(settings);
        }
    }

    /// Replace the stop settings, effective on the next tick
    pub fn configure_stop(&self, settings: StopSettings) {
        if let Some(mut engine) = self.engine() {
            engine.configure_stop(settings);
        }
    }

    /// Replace the tamper settings, effective on the next tick
    pub fn configure_tamper(&self, settings: TamperSettings) {
        if let Some(mut engine) = self.engine() {
            engine.configure_tamper(settings);
        }
    }

    /// Configure all four detectors at once
    pub fn configure_all(&self, settings: DetectionSettings) {
        if let Some(mut engine) = self.engine() {
            engine.configure_tipping(settings.tipping);
            engine.configure_movement(settings.movement);
            engine.configure_stop(settings.stop);
            engine.configure_tamper(settings.tamper);
        }
    }

    /// True iff at least one detector is configured
    pub fn check_configurations(&self) -> bool {
        self.engine()
            .map(|engine| engine.check_configurations())
            .unwrap_or(false)
    }

    /// Latest sample, zeroed while empty or unavailable
    pub fn axis_data(&self) -> AxisSample {
        self.engine()
            .map(|engine| engine.axis_data())
            .unwrap_or_default()
    }

    /// Current tipped flag
    pub fn tipped_state(&self) -> bool {
        self.engine()
            .map(|engine| engine.tipped_state())
            .unwrap_or(false)
    }

    /// Current moving flag
    pub fn moving_state(&self) -> bool {
        self.engine()
            .map(|engine| engine.moving_state())
            .unwrap_or(false)
    }

    /// Current tamper flag
    pub fn tamper_state(&self) -> bool {
        self.engine()
            .map(|engine| engine.tamper_state())
            .unwrap_or(false)
    }

    /// Current device state
    pub fn device_state(&self) -> DeviceState {
        self.engine()
            .map(|engine| engine.device_state())
            .unwrap_or_default()
    }

    /// Copy of the last captured tipping event
    pub fn tipping_data(&self) -> TippingEvent {
        self.engine()
            .map(|engine| engine.tipping_data())
            .unwrap_or_default()
    }

    /// Copy of the last captured movement event
    pub fn movement_data(&self) -> MovementEvent {
        self.engine()
            .map(|engine| engine.movement_data())
            .unwrap_or_default()
    }

    /// Copy of the last captured stop event
    pub fn stop_data(&self) -> StopEvent {
        self.engine()
            .map(|engine| engine.stop_data())
            .unwrap_or_default()
    }

    /// Copy of the last captured tamper event
    pub fn tamper_data(&self) -> TamperEvent {
        self.engine()
            .map(|engine| engine.tamper_data())
            .unwrap_or_default()
    }

    /// Current tipping settings
    pub fn tipping_settings(&self) -> TippingSettings {
        self.engine()
            .map(|engine| engine.tipping_settings())
            .unwrap_or_default()
    }

    /// Current movement settings
    pub fn movement_settings(&self) -> MovementSettings {
        self.engine()
            .map(|engine| engine.movement_settings())
            .unwrap_or_default()
    }

    /// Current stop settings
    pub fn stop_settings(&self) -> StopSettings {
        self.engine()
            .map(|engine| engine.stop_settings())
            .unwrap_or_default()
    }

    /// Current tamper settings
    pub fn tamper_settings(&self) -> TamperSettings {
        self.engine()
            .map(|engine| engine.tamper_settings())
            .unwrap_or_default()
    }

    /// Copy of the whole sample history, oldest first
    pub fn history_snapshot(&self) -> Vec<AxisSample> {
        self.engine()
            .map(|engine| engine.history_snapshot())
            .unwrap_or_default()
    }

    /// Number of samples currently held
    pub fn history_len(&self) -> usize {
        self.engine().map(|engine| engine.history_len()).unwrap_or(0)
    }

    /// Discard the sample history (called when the producer stops)
    pub fn reset_measurements(&self) {
        if let Some(mut engine) = self.engine() {
            engine.reset_measurements();
        }
    }
}

impl Default for MotionMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MotionMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionMonitor")
            .field("state", &self.device_state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Vector3;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::thread;

    fn test_settings() -> DetectionSettings {
        DetectionSettings {
            tipping: TippingSettings {
                minimum_samples: 16,
                start_threshold_deg: 140.0,
            },
            movement: MovementSettings {
                minimum_samples: 4,
                interval_g: 0.04,
            },
            stop: StopSettings {
                minimum_samples: 8,
                interval_g: 0.03,
            },
            tamper: TamperSettings {
                minimum_samples: 5,
                time_window_s: 10,
            },
        }
    }

    fn moving_sample(time_ms: u64) -> AxisSample {
        AxisSample {
            time_ms,
            acc: Vector3::new(0.3, 1.0, 0.0),
            ..Default::default()
        }
    }

    struct CountingObserver {
        movements: Arc<AtomicU64>,
    }

    impl MotionObserver for CountingObserver {
        fn on_tipping(&mut self, _event: &TippingEvent) {}

        fn on_movement(&mut self, _event: &MovementEvent) {
            self.movements.fetch_add(1, Ordering::Relaxed);
        }

        fn on_stop(&mut self, _event: &StopEvent) {}
    }

    #[test]
    fn configure_round_trip_through_the_lock() {
        let monitor = MotionMonitor::new();
        let settings = test_settings();
        monitor.configure_all(settings);

        assert_eq!(monitor.tipping_settings(), settings.tipping);
        assert_eq!(monitor.movement_settings(), settings.movement);
        assert_eq!(monitor.stop_settings(), settings.stop);
        assert_eq!(monitor.tamper_settings(), settings.tamper);
        assert!(monitor.check_configurations());
    }

    #[test]
    fn observers_hear_confirmed_transitions() {
        let monitor = MotionMonitor::with_settings(test_settings());
        let movements = Arc::new(AtomicU64::new(0));
        let id = monitor
            .attach(Box::new(CountingObserver {
                movements: Arc::clone(&movements),
            }))
            .unwrap();

        for i in 0..10 {
            monitor.add_measurement(moving_sample(i * 100));
        }

        // Movement confirmed exactly once despite 10 confirming ticks
        assert_eq!(movements.load(Ordering::Relaxed), 1);
        assert!(monitor.moving_state());

        assert!(monitor.detach(id));
        assert!(!monitor.detach(id));
    }

    #[test]
    fn concurrent_producer_and_readers() {
        let monitor = MotionMonitor::with_settings(test_settings());

        let producer = {
            let monitor = monitor.clone();
            thread::spawn(move || {
                for i in 0..500u64 {
                    monitor.add_measurement(moving_sample(i * 10));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let monitor = monitor.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        // Snapshot reads must never panic or tear
                        let _ = monitor.device_state();
                        let _ = monitor.axis_data();
                        let _ = monitor.tipped_state();
                    }
                })
            })
            .collect();

        producer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }

        assert!(monitor.moving_state());
        assert_eq!(monitor.device_state(), DeviceState::Moving);
    }

    #[test]
    fn default_answers_before_any_sample() {
        let monitor = MotionMonitor::new();
        assert_eq!(monitor.axis_data(), AxisSample::default());
        assert_eq!(monitor.device_state(), DeviceState::Stopped);
        assert!(!monitor.tipped_state());
        assert_eq!(monitor.tipping_data(), TippingEvent::default());
        assert_eq!(monitor.history_len(), 0);
    }

    #[test]
    fn reset_measurements_clears_history() {
        let monitor = MotionMonitor::with_settings(test_settings());
        for i in 0..20 {
            monitor.add_measurement(moving_sample(i * 100));
        }
        assert_eq!(monitor.history_len(), 20);

        monitor.reset_measurements();
        assert_eq!(monitor.history_len(), 0);
        assert_eq!(monitor.axis_data(), AxisSample::default());
    }
}
