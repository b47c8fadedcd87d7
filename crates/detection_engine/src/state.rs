//! DeviceState derivation.
//!
//! A pure function of the three debounced flags plus one piece of carried
//! state: the timestamp at which a tipped-while-moving combination first
//! began. Precedence is fixed; the only temporal rule is the escalation
//! of a sustained tipped+moving condition to tamper.

use contracts::DeviceState;

/// Carried timer for the tipped-while-moving escalation
///
/// Cleared whenever the combination does not hold. After an escalation
/// fires the timer is also cleared, so a combination that persists
/// re-escalates only after another full window.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscalationTimer {
    first_moving_tip_ms: Option<u64>,
}

impl EscalationTimer {
    /// Create a cleared timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp at which the current tipped+moving run began, if any
    pub fn started_at_ms(&self) -> Option<u64> {
        self.first_moving_tip_ms
    }
}

/// Derive the next DeviceState.
///
/// Evaluated in precedence order:
/// 1. tamper flag → `Tamper`
/// 2. tipped, not moving → `Tipped`
/// 3. tipped and moving → keep `previous` until the combination has
///    lasted longer than `tamper_window_s`, then `Tamper` (once)
/// 4. moving, not tipped → `Moving`
/// 5. otherwise → `Stopped`
pub fn update_device_state(
    tipped: bool,
    moving: bool,
    tamper: bool,
    now_ms: u64,
    tamper_window_s: u64,
    previous: DeviceState,
    timer: &mut EscalationTimer,
) -> DeviceState {
    let next = if tamper {
        DeviceState::Tamper
    } else if tipped && !moving {
        DeviceState::Tipped
    } else if tipped && moving {
        match timer.first_moving_tip_ms {
            None => {
                timer.first_moving_tip_ms = Some(now_ms);
                previous
            }
            Some(first) if now_ms.saturating_sub(first) > tamper_window_s.saturating_mul(1000) => {
                timer.first_moving_tip_ms = None;
                DeviceState::Tamper
            }
            Some(_) => previous,
        }
    } else if moving {
        DeviceState::Moving
    } else {
        DeviceState::Stopped
    };

    if !(tipped && moving) {
        timer.first_moving_tip_ms = None;
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW_S: u64 = 10;

    #[test]
    fn tamper_flag_takes_precedence() {
        let mut timer = EscalationTimer::new();
        // All three flags at once must yield Tamper, never Tipped/Moving
        let state = update_device_state(
            true,
            true,
            true,
            0,
            WINDOW_S,
            DeviceState::Stopped,
            &mut timer,
        );
        assert_eq!(state, DeviceState::Tamper);
        // Tamper branch bypasses the escalation timer entirely
        assert!(timer.started_at_ms().is_none());
    }

    #[test]
    fn plain_states() {
        let mut timer = EscalationTimer::new();
        assert_eq!(
            update_device_state(true, false, false, 0, WINDOW_S, DeviceState::Stopped, &mut timer),
            DeviceState::Tipped
        );
        assert_eq!(
            update_device_state(false, true, false, 0, WINDOW_S, DeviceState::Stopped, &mut timer),
            DeviceState::Moving
        );
        assert_eq!(
            update_device_state(false, false, false, 0, WINDOW_S, DeviceState::Moving, &mut timer),
            DeviceState::Stopped
        );
    }

    #[test]
    fn escalation_waits_out_the_window() {
        let mut timer = EscalationTimer::new();
        let previous = DeviceState::Moving;

        // First tick opens the window and keeps the previous state
        let s1 = update_device_state(true, true, false, 1_000, WINDOW_S, previous, &mut timer);
        assert_eq!(s1, DeviceState::Moving);
        assert_eq!(timer.started_at_ms(), Some(1_000));

        // Inside the window: unchanged
        let s2 = update_device_state(true, true, false, 6_000, WINDOW_S, s1, &mut timer);
        assert_eq!(s2, DeviceState::Moving);

        // Exactly at the boundary: strictly-greater comparison, unchanged
        let s3 = update_device_state(true, true, false, 11_000, WINDOW_S, s2, &mut timer);
        assert_eq!(s3, DeviceState::Moving);

        // Past the boundary: escalates and clears the timer
        let s4 = update_device_state(true, true, false, 11_001, WINDOW_S, s3, &mut timer);
        assert_eq!(s4, DeviceState::Tamper);
        assert!(timer.started_at_ms().is_none());
    }

    #[test]
    fn escalation_restarts_after_firing() {
        let mut timer = EscalationTimer::new();
        let mut state = DeviceState::Moving;

        state = update_device_state(true, true, false, 0, WINDOW_S, state, &mut timer);
        state = update_device_state(true, true, false, 10_001, WINDOW_S, state, &mut timer);
        assert_eq!(state, DeviceState::Tamper);

        // The combination persists: the timer restarts, so the next full
        // window must elapse before Tamper is derived through this branch
        // again.
        state = update_device_state(true, true, false, 10_100, WINDOW_S, state, &mut timer);
        assert_eq!(state, DeviceState::Tamper); // previous carried over
        assert_eq!(timer.started_at_ms(), Some(10_100));

        state = update_device_state(true, true, false, 15_000, WINDOW_S, state, &mut timer);
        assert_eq!(timer.started_at_ms(), Some(10_100));
        assert_eq!(state, DeviceState::Tamper);
    }

    #[test]
    fn leaving_the_combination_clears_the_timer() {
        let mut timer = EscalationTimer::new();

        update_device_state(true, true, false, 0, WINDOW_S, DeviceState::Moving, &mut timer);
        assert!(timer.started_at_ms().is_some());

        // Tip resolves; timer must clear
        update_device_state(false, true, false, 2_000, WINDOW_S, DeviceState::Moving, &mut timer);
        assert!(timer.started_at_ms().is_none());

        // Re-entering the combination starts a fresh window
        update_device_state(true, true, false, 3_000, WINDOW_S, DeviceState::Moving, &mut timer);
        assert_eq!(timer.started_at_ms(), Some(3_000));
    }
}
