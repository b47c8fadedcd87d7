//! SampleSource trait - IMU data source abstraction
//!
//! Defines a unified interface for sample sources, decoupling the
//! ingestion pipeline from concrete sensor implementations. Mock and
//! replay sources (and a real bus driver, out of scope here) all present
//! the same callback-driven surface.

use std::sync::Arc;

use crate::{AxisSample, ContractError, ImuOffsets};

/// Sample data callback type
///
/// When a source produces a reading, it sends an `AxisSample` through this
/// callback. Uses `Arc` to allow callback sharing across multiple contexts.
pub type SampleCallback = Arc<dyn Fn(AxisSample) + Send + Sync>;

/// Sample source trait
///
/// Abstracts the common behavior of mock, replay and hardware sources.
///
/// # Design Principles
///
/// 1. **Decoupling**: Separates sample generation from consumption
/// 2. **Unified Interface**: Mock and replay sources use the same API
/// 3. **Callback Pattern**: Uses callbacks instead of channels, matching
///    how hardware sample-ready interrupts naturally surface
pub trait SampleSource: Send + Sync {
    /// Get source ID
    fn source_id(&self) -> &str;

    /// Register data callback
    ///
    /// When the source produces a reading, it calls the callback with an
    /// `AxisSample`. If already listening, repeated calls are idempotent
    /// (a second callback is never registered).
    fn listen(&self, callback: SampleCallback);

    /// Stop producing samples
    ///
    /// Must be satisfied before the producing task/thread is reclaimed;
    /// `stop` blocks until the producer has wound down.
    fn stop(&self);

    /// Check if currently listening
    fn is_listening(&self) -> bool;

    /// Run a calibration pass and return the resulting offsets
    ///
    /// Sources without a physical sensor return their configured offsets.
    ///
    /// # Errors
    /// `CalibrationUnsupported` when the source cannot calibrate.
    fn calibrate(&self) -> Result<ImuOffsets, ContractError>;
}
