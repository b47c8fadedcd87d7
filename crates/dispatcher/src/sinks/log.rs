//! LogSink - logs event summaries via tracing

use contracts::{ContractError, EventSink, MotionEvent};
use tracing::{info, instrument};

/// Sink that logs confirmed events for debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_event_summary(&self, event: &MotionEvent) {
        match event {
            MotionEvent::Tipping(e) => {
                info!(
                    sink = %self.name,
                    start_time_ms = e.start_time_ms,
                    side = %e.side,
                    context_samples = e.history.len(),
                    "Tipping confirmed"
                );
            }
            MotionEvent::Movement(e) => {
                info!(
                    sink = %self.name,
                    start_time_ms = e.start_time_ms,
                    "Movement confirmed"
                );
            }
            MotionEvent::Stop(e) => {
                info!(
                    sink = %self.name,
                    start_time_ms = e.start_time_ms,
                    "Stop confirmed"
                );
            }
            MotionEvent::Tamper(e) => {
                info!(
                    sink = %self.name,
                    start_time_ms = e.start_time_ms,
                    "Tamper confirmed"
                );
            }
        }
    }
}

impl EventSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, event),
        fields(sink = %self.name, kind = event.kind())
    )]
    async fn write(&mut self, event: &MotionEvent) -> Result<(), ContractError> {
        self.log_event_summary(event);
        Ok(())
    }

    #[instrument(name = "log_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
