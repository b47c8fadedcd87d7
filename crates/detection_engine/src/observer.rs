//! Synchronous observer registry.
//!
//! Subscribers live in a slot table and are addressed by the owned
//! `ObserverId` their `attach` returned, so detaching during later
//! iteration can never leave a dangling reference. Notification is
//! synchronous and in registration order.

use contracts::{MotionEvent, MovementEvent, StopEvent, TippingEvent};
use slab::Slab;
use tracing::debug;

/// Callbacks invoked on confirmed transitions
///
/// Implementations run inline on the detection path and must not block.
pub trait MotionObserver: Send {
    /// A tipping event was confirmed
    fn on_tipping(&mut self, event: &TippingEvent);

    /// A movement event was confirmed
    fn on_movement(&mut self, event: &MovementEvent);

    /// A stop event was confirmed
    fn on_stop(&mut self, event: &StopEvent);
}

/// Owned subscription handle returned by `attach`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

/// Ordered set of subscribers
#[derive(Default)]
pub struct ObserverRegistry {
    slots: Slab<Box<dyn MotionObserver>>,
    /// Slab keys in attach order; slab key reuse must not reorder
    /// notification
    order: Vec<usize>,
}

impl ObserverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber, returning its handle
    pub fn attach(&mut self, observer: Box<dyn MotionObserver>) -> ObserverId {
        let key = self.slots.insert(observer);
        self.order.push(key);
        ObserverId(key)
    }

    /// Remove a subscriber by handle; false if already detached
    pub fn detach(&mut self, id: ObserverId) -> bool {
        if self.slots.try_remove(id.0).is_some() {
            self.order.retain(|&key| key != id.0);
            true
        } else {
            false
        }
    }

    /// Number of registered subscribers
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when nobody is subscribed
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Invoke every subscriber, in registration order.
    ///
    /// An empty registry is a no-op (logged, not an error). Tamper
    /// events reach sinks through the dispatcher only; the observer
    /// surface mirrors the tipping/movement/stop callbacks.
    pub fn notify(&mut self, event: &MotionEvent) {
        if matches!(event, MotionEvent::Tamper(_)) {
            return;
        }

        if self.slots.is_empty() {
            debug!(kind = event.kind(), "no observers attached");
            return;
        }

        for &key in &self.order {
            if let Some(observer) = self.slots.get_mut(key) {
                match event {
                    MotionEvent::Tipping(e) => observer.on_tipping(e),
                    MotionEvent::Movement(e) => observer.on_movement(e),
                    MotionEvent::Stop(e) => observer.on_stop(e),
                    MotionEvent::Tamper(_) => {}
                }
            }
        }
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("len", &self.slots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::TamperEvent;
    use std::sync::{Arc, Mutex};

    /// Records which callbacks fired, tagged with an identity
    struct RecordingObserver {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl MotionObserver for RecordingObserver {
        fn on_tipping(&mut self, _event: &TippingEvent) {
            self.log.lock().unwrap().push(format!("{}:tipping", self.tag));
        }

        fn on_movement(&mut self, event: &MovementEvent) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:movement@{}", self.tag, event.start_time_ms));
        }

        fn on_stop(&mut self, _event: &StopEvent) {
            self.log.lock().unwrap().push(format!("{}:stop", self.tag));
        }
    }

    fn recording(tag: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Box<dyn MotionObserver> {
        Box::new(RecordingObserver {
            tag,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn notify_runs_in_attach_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ObserverRegistry::new();
        registry.attach(recording("a", &log));
        registry.attach(recording("b", &log));

        registry.notify(&MotionEvent::Movement(MovementEvent { start_time_ms: 7 }));

        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:movement@7".to_string(), "b:movement@7".to_string()]
        );
    }

    #[test]
    fn detach_is_identity_based() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ObserverRegistry::new();
        let a = registry.attach(recording("a", &log));
        let _b = registry.attach(recording("b", &log));

        assert!(registry.detach(a));
        assert!(!registry.detach(a)); // already gone
        assert_eq!(registry.len(), 1);

        registry.notify(&MotionEvent::Stop(StopEvent { start_time_ms: 0 }));
        assert_eq!(*log.lock().unwrap(), vec!["b:stop".to_string()]);
    }

    #[test]
    fn slot_reuse_keeps_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ObserverRegistry::new();
        let a = registry.attach(recording("a", &log));
        registry.attach(recording("b", &log));
        registry.detach(a);
        // "c" may reuse the freed slot but must be notified after "b"
        registry.attach(recording("c", &log));

        registry.notify(&MotionEvent::Tipping(TippingEvent::default()));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["b:tipping".to_string(), "c:tipping".to_string()]
        );
    }

    #[test]
    fn empty_registry_is_a_noop() {
        let mut registry = ObserverRegistry::new();
        // Must not panic or error
        registry.notify(&MotionEvent::Movement(MovementEvent { start_time_ms: 1 }));
        assert!(registry.is_empty());
    }

    #[test]
    fn tamper_events_skip_observers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ObserverRegistry::new();
        registry.attach(recording("a", &log));

        registry.notify(&MotionEvent::Tamper(TamperEvent { start_time_ms: 3 }));
        assert!(log.lock().unwrap().is_empty());
    }
}
