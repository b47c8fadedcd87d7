//! Main detection engine implementation.

use contracts::{
    AxisSample, DetectionSettings, DeviceState, MotionEvent, MovementEvent, MovementSettings,
    StopEvent, StopSettings, TamperEvent, TamperSettings, TippingEvent, TippingSettings,
    TippingSide,
};
use tracing::{instrument, trace};

use crate::debounce::Debouncer;
use crate::detectors::{
    movement_qualifies, stop_qualifies, tamper_qualifies, tipping_qualifies,
};
use crate::history::{HistoryBuffer, HISTORY_CAPACITY};
use crate::state::{update_device_state, EscalationTimer};

/// Motion event detection engine
///
/// Owns the sample history, one debouncer per detector, the latched
/// flags, the captured event data and the derived `DeviceState`. Not
/// thread-safe on its own; `MotionMonitor` provides the lock discipline.
#[derive(Debug)]
pub struct DetectionEngine {
    /// Per-detector threshold settings (replaced wholesale on configure)
    tipping_settings: TippingSettings,
    movement_settings: MovementSettings,
    stop_settings: StopSettings,
    tamper_settings: TamperSettings,

    /// Bounded context window of recent samples
    history: HistoryBuffer,

    /// Per-detector consecutive-qualifying-sample runs
    tipping_run: Debouncer,
    movement_run: Debouncer,
    stop_run: Debouncer,
    tamper_run: Debouncer,

    /// Debounced flags
    tipped: bool,
    moving: bool,
    tamper: bool,

    /// Event data captured at the latest confirmation (overwritten, not
    /// merged)
    tipping_data: TippingEvent,
    movement_data: MovementEvent,
    stop_data: StopEvent,
    tamper_data: TamperEvent,

    /// Single authoritative state, recomputed every tick
    device_state: DeviceState,

    /// Carried tipped-while-moving escalation timer
    escalation: EscalationTimer,
}

impl DetectionEngine {
    /// Create an unconfigured engine; detection ticks are skipped until
    /// at least one detector is configured
    pub fn new() -> Self {
        Self {
            tipping_settings: TippingSettings::default(),
            movement_settings: MovementSettings::default(),
            stop_settings: StopSettings::default(),
            tamper_settings: TamperSettings::default(),
            history: HistoryBuffer::new(HISTORY_CAPACITY),
            tipping_run: Debouncer::new(),
            movement_run: Debouncer::new(),
            stop_run: Debouncer::new(),
            tamper_run: Debouncer::new(),
            tipped: false,
            moving: false,
            tamper: false,
            tipping_data: TippingEvent::default(),
            movement_data: MovementEvent::default(),
            stop_data: StopEvent::default(),
            tamper_data: TamperEvent::default(),
            device_state: DeviceState::Stopped,
            escalation: EscalationTimer::new(),
        }
    }

    /// Create an engine with all four detectors configured
    pub fn with_settings(settings: DetectionSettings) -> Self {
        let mut engine = Self::new();
        engine.configure_tipping(settings.tipping);
        engine.configure_movement(settings.movement);
        engine.configure_stop(settings.stop);
        engine.configure_tamper(settings.tamper);
        engine
    }

    /// Replace the tipping settings, effective on the next tick.
    /// In-progress debounce runs are not reset.
    pub fn configure_tipping(&mut self, settings: TippingSettings) {
        self.tipping_settings = settings;
    }

    /// Replace the movement settings, effective on the next tick
    pub fn configure_movement(&mut self, settings: MovementSettings) {
        self.movement_settings = settings;
    }

    /// Replace the stop settings, effective on the next tick
    pub fn configure_stop(&mut self, settings: StopSettings) {
        self.stop_settings = settings;
    }

    /// Replace the tamper settings, effective on the next tick
    pub fn configure_tamper(&mut self, settings: TamperSettings) {
        self.tamper_settings = settings;
    }

    /// True iff at least one detector has a non-zero minimum-sample count
    pub fn check_configurations(&self) -> bool {
        self.tipping_settings.minimum_samples != 0
            || self.movement_settings.minimum_samples != 0
            || self.stop_settings.minimum_samples != 0
            || self.tamper_settings.minimum_samples != 0
    }

    /// Ingest one sample and run a detection tick.
    ///
    /// Returns the confirmed transitions this tick produced, in detection
    /// order. With no configured detector the sample is still recorded
    /// but the tick is skipped and the engine stays in its last state.
    #[instrument(
        level = "trace",
        name = "detection_engine_push",
        skip(self, sample),
        fields(time_ms = sample.time_ms)
    )]
    pub fn push(&mut self, sample: AxisSample) -> Vec<MotionEvent> {
        self.history.push(sample);

        if !self.check_configurations() {
            trace!("no detector configured, tick skipped");
            return Vec::new();
        }

        let was_tipped = self.tipped;
        let was_moving = self.moving;
        let was_tamper = self.tamper;

        self.detect_tipping();
        self.detect_tamper();
        // Movement and stop are mutually exclusive per tick: only the
        // detector that can change the current motion state runs.
        if self.moving {
            self.detect_stop();
        } else {
            self.detect_movement();
        }
        self.update_state(sample.time_ms);

        let mut events = Vec::new();
        if self.tipped && !was_tipped {
            events.push(MotionEvent::Tipping(self.tipping_data.clone()));
        }
        if self.moving && !was_moving {
            events.push(MotionEvent::Movement(self.movement_data));
        }
        if was_moving && !self.moving {
            events.push(MotionEvent::Stop(self.stop_data));
        }
        if self.tamper && !was_tamper {
            events.push(MotionEvent::Tamper(self.tamper_data));
        }

        for event in &events {
            metrics::counter!("tiltwatch_events_confirmed_total", "kind" => event.kind())
                .increment(1);
        }
        metrics::gauge!("tiltwatch_device_state_code").set(state_code(self.device_state));

        events
    }

    /// Run the tipping detector against the latest sample
    fn detect_tipping(&mut self) {
        let last = match self.history.last() {
            Some(sample) => sample,
            None => return,
        };

        let qualifies = tipping_qualifies(&last, &self.tipping_settings);
        self.tipping_run.observe(qualifies, last.time_ms);
        if qualifies {
            trace!(
                count = self.tipping_run.count(),
                roll = last.roll,
                pitch = last.pitch,
                "tipping sample"
            );
        }

        // Confirmation additionally requires a full buffer: a tip report
        // must carry a complete window of context samples.
        if self.tipping_run.confirmed(self.tipping_settings.minimum_samples)
            && self.history.is_full()
        {
            self.tipped = true;
            self.tipping_data = TippingEvent {
                start_time_ms: self.tipping_run.first_time_ms(),
                side: if last.pitch > 0.0 {
                    TippingSide::Left
                } else {
                    TippingSide::Right
                },
                history: self.history.snapshot(),
            };
        } else {
            self.tipped = false;
        }
    }

    /// Run the movement detector against the latest sample
    fn detect_movement(&mut self) {
        let last = match self.history.last() {
            Some(sample) => sample,
            None => return,
        };

        let qualifies = movement_qualifies(&last, &self.movement_settings);
        self.movement_run.observe(qualifies, last.time_ms);

        if self.movement_run.confirmed(self.movement_settings.minimum_samples) {
            self.stop_run.reset();
            self.moving = true;
            self.movement_data = MovementEvent {
                start_time_ms: self.movement_run.first_time_ms(),
            };
        }
    }

    /// Run the stop detector against the latest sample
    fn detect_stop(&mut self) {
        let last = match self.history.last() {
            Some(sample) => sample,
            None => return,
        };

        let qualifies = stop_qualifies(&last, &self.stop_settings);
        self.stop_run.observe(qualifies, last.time_ms);

        if self.stop_run.confirmed(self.stop_settings.minimum_samples) {
            self.movement_run.reset();
            self.moving = false;
            self.stop_data = StopEvent {
                start_time_ms: self.stop_run.first_time_ms(),
            };
        }
    }

    /// Run the tamper detector against the latest sample
    fn detect_tamper(&mut self) {
        let last = match self.history.last() {
            Some(sample) => sample,
            None => return,
        };

        let qualifies = tamper_qualifies(&last);
        self.tamper_run.observe(qualifies, last.time_ms);

        if self.tamper_run.confirmed(self.tamper_settings.minimum_samples) {
            self.tamper = true;
            self.tamper_data = TamperEvent {
                start_time_ms: self.tamper_run.first_time_ms(),
            };
        } else {
            self.tamper = false;
        }
    }

    /// Recompute the authoritative DeviceState
    fn update_state(&mut self, now_ms: u64) {
        self.device_state = update_device_state(
            self.tipped,
            self.moving,
            self.tamper,
            now_ms,
            self.tamper_settings.time_window_s,
            self.device_state,
            &mut self.escalation,
        );
    }

    /// Latest sample, or a zeroed sample while the history is empty
    pub fn axis_data(&self) -> AxisSample {
        self.history.last().unwrap_or_default()
    }

    /// Current tipped flag
    pub fn tipped_state(&self) -> bool {
        self.tipped
    }

    /// Current moving flag
    pub fn moving_state(&self) -> bool {
        self.moving
    }

    /// Current tamper flag
    pub fn tamper_state(&self) -> bool {
        self.tamper
    }

    /// Current device state
    pub fn device_state(&self) -> DeviceState {
        self.device_state
    }

    /// Copy of the last captured tipping event
    pub fn tipping_data(&self) -> TippingEvent {
        self.tipping_data.clone()
    }

    /// Copy of the last captured movement event
    pub fn movement_data(&self) -> MovementEvent {
        self.movement_data
    }

    /// Copy of the last captured stop event
    pub fn stop_data(&self) -> StopEvent {
        self.stop_data
    }

    /// Copy of the last captured tamper event
    pub fn tamper_data(&self) -> TamperEvent {
        self.tamper_data
    }

    /// Current tipping settings
    pub fn tipping_settings(&self) -> TippingSettings {
        self.tipping_settings
    }

    /// Current movement settings
    pub fn movement_settings(&self) -> MovementSettings {
        self.movement_settings
    }

    /// Current stop settings
    pub fn stop_settings(&self) -> StopSettings {
        self.stop_settings
    }

    /// Current tamper settings
    pub fn tamper_settings(&self) -> TamperSettings {
        self.tamper_settings
    }

    /// Copy of the whole history, oldest first
    pub fn history_snapshot(&self) -> Vec<AxisSample> {
        self.history.snapshot()
    }

    /// Number of samples currently held
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Discard the sample history (flags and state are untouched)
    pub fn reset_measurements(&mut self) {
        self.history.clear();
    }
}

impl Default for DetectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn state_code(state: DeviceState) -> f64 {
    match state {
        DeviceState::Stopped => 0.0,
        DeviceState::Moving => 1.0,
        DeviceState::Tipped => 2.0,
        DeviceState::Tamper => 3.0,
    }
}
