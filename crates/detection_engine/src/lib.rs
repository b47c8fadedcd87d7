//! # Detection Engine
//!
//! Motion/orientation event detection core.
//!
//! Responsibilities:
//! - Bounded sample history (overwrite-oldest ring, capacity 100)
//! - Debounced tipping / movement / stop / tamper detection
//! - `DeviceState` derivation with the tipped-while-moving escalation
//! - Lock-guarded shared state with degraded-but-safe failure modes
//! - Synchronous observer notification on confirmed transitions
//!
//! ## Usage example
//!
//! ```ignore
//! use detection_engine::MotionMonitor;
//! use contracts::{DetectionSettings, TippingSettings};
//!
//! let monitor = MotionMonitor::new();
//! monitor.configure_tipping(TippingSettings {
//!     minimum_samples: 16,
//!     start_threshold_deg: 140.0,
//! });
//!
//! // Producer side, once per reading:
//! for event in monitor.add_measurement(sample) {
//!     // Confirmed transition
//! }
//!
//! // Query side, any thread:
//! let state = monitor.device_state();
//! ```

mod debounce;
mod detectors;
mod engine;
mod history;
mod monitor;
mod observer;
mod state;

pub use debounce::Debouncer;
pub use detectors::{
    acc_magnitude, movement_qualifies, stop_qualifies, tamper_qualifies, tipping_qualifies,
};
pub use engine::DetectionEngine;
pub use history::{HistoryBuffer, HISTORY_CAPACITY};
pub use monitor::MotionMonitor;
pub use observer::{MotionObserver, ObserverId, ObserverRegistry};
pub use state::{update_device_state, EscalationTimer};

// Re-export contracts types
pub use contracts::{
    AxisSample, DetectionSettings, DeviceState, MotionEvent, MovementEvent, MovementSettings,
    StopEvent, StopSettings, TamperEvent, TamperSettings, TippingEvent, TippingSettings,
    TippingSide,
};
