//! EventSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for sinks consuming confirmed events.

use crate::{ContractError, MotionEvent};

/// Event output trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(EventSink: Send)]
pub trait LocalEventSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write a confirmed motion event
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, event: &MotionEvent) -> Result<(), ContractError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), ContractError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), ContractError>;
}
