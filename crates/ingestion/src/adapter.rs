//! Source adapter trait and the callback bridge.
//!
//! Adapters own the glue between a `SampleSource` and the pipeline's
//! bounded channel: register the callback, forward samples, account for
//! backpressure drops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_channel::{Sender, TrySendError};
use contracts::{AxisSample, DropPolicy, SampleCallback, SampleSource};
use tracing::{debug, trace, warn};

use crate::config::{BackpressureConfig, IngestionMetrics};

/// Source adapter trait
///
/// One per registered source. Responsible for:
/// 1. Registering the source callback
/// 2. Forwarding samples into the channel (handling backpressure)
/// 3. Lifecycle (start / stop / is_listening)
pub trait SourceAdapter: Send + Sync {
    /// Get source ID
    fn source_id(&self) -> &str;

    /// Start sample forwarding
    fn start(&self, tx: Sender<AxisSample>, metrics: Arc<IngestionMetrics>);

    /// Stop sample forwarding
    fn stop(&self);

    /// Check if the adapter is forwarding
    fn is_listening(&self) -> bool;
}

/// Forward one sample, applying the drop policy when the channel is full
#[inline]
pub(crate) fn send_sample(
    tx: &Sender<AxisSample>,
    sample: AxisSample,
    metrics: &Arc<IngestionMetrics>,
    source_id: &str,
    drop_policy: DropPolicy,
) {
    match tx.try_send(sample) {
        Ok(_) => {
            metrics.update_queue_len(tx.len());
            trace!(source_id = %source_id, "sample sent");
        }
        Err(TrySendError::Full(_)) => {
            metrics.record_dropped();
            match drop_policy {
                DropPolicy::DropNewest => {
                    trace!(source_id = %source_id, "sample dropped (newest)");
                }
                DropPolicy::DropOldest => {
                    // TODO: switch to a channel with sender-side pop so
                    // DropOldest can evict the queued sample instead of
                    // falling back to dropping the incoming one
                    trace!(source_id = %source_id, "sample dropped (oldest fallback)");
                }
            }
        }
        Err(TrySendError::Closed(_)) => {
            warn!(source_id = %source_id, "channel closed");
        }
    }
}

/// Generic adapter bridging any `SampleSource` onto the channel
pub struct CallbackSourceAdapter {
    source_id: String,
    source: Box<dyn SampleSource>,
    config: BackpressureConfig,
    listening: Arc<AtomicBool>,
}

impl CallbackSourceAdapter {
    /// Create a new adapter around a source
    pub fn new(
        source_id: String,
        source: Box<dyn SampleSource>,
        config: BackpressureConfig,
    ) -> Self {
        Self {
            source_id,
            source,
            config,
            listening: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl SourceAdapter for CallbackSourceAdapter {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn start(&self, tx: Sender<AxisSample>, metrics: Arc<IngestionMetrics>) {
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }

        let source_id = self.source_id.clone();
        let drop_policy = self.config.drop_policy;
        let listening = self.listening.clone();

        debug!(source_id = %source_id, "starting source adapter");

        let callback: SampleCallback = Arc::new(move |sample| {
            if !listening.load(Ordering::Relaxed) {
                return;
            }

            metrics.record_received();
            metrics::counter!("tiltwatch_samples_received_total", "source_id" => source_id.clone())
                .increment(1);
            send_sample(&tx, sample, &metrics, &source_id, drop_policy);
        });

        self.source.listen(callback);
    }

    fn stop(&self) {
        if self.listening.swap(false, Ordering::SeqCst) {
            debug!(source_id = %self.source_id, "stopping source adapter");
            self.source.stop();
        }
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_channel::bounded;
    use contracts::{ContractError, ImuOffsets};
    use std::thread;
    use std::time::Duration;

    /// Source that emits a fixed script of samples when listened to
    struct ScriptedSource {
        source_id: String,
        script: Vec<AxisSample>,
        listening: Arc<AtomicBool>,
    }

    impl ScriptedSource {
        fn new(source_id: &str, script: Vec<AxisSample>) -> Self {
            Self {
                source_id: source_id.to_string(),
                script,
                listening: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    impl SampleSource for ScriptedSource {
        fn source_id(&self) -> &str {
            &self.source_id
        }

        fn listen(&self, callback: SampleCallback) {
            if self.listening.swap(true, Ordering::SeqCst) {
                return;
            }
            let script = self.script.clone();
            let listening = self.listening.clone();
            thread::spawn(move || {
                for sample in script {
                    if !listening.load(Ordering::Relaxed) {
                        break;
                    }
                    callback(sample);
                    // Pace the script so stop() can interleave
                    thread::sleep(Duration::from_micros(100));
                }
                listening.store(false, Ordering::SeqCst);
            });
        }

        fn stop(&self) {
            self.listening.store(false, Ordering::SeqCst);
        }

        fn is_listening(&self) -> bool {
            self.listening.load(Ordering::Relaxed)
        }

        fn calibrate(&self) -> Result<ImuOffsets, ContractError> {
            Ok(ImuOffsets::default())
        }
    }

    fn sample_at(time_ms: u64) -> AxisSample {
        AxisSample {
            time_ms,
            ..Default::default()
        }
    }

    #[test]
    fn forwards_samples_to_channel() {
        let script: Vec<_> = (0..5).map(|i| sample_at(i * 10)).collect();
        let adapter = CallbackSourceAdapter::new(
            "imu".to_string(),
            Box::new(ScriptedSource::new("imu", script)),
            BackpressureConfig::default(),
        );

        let (tx, rx) = bounded(16);
        let metrics = Arc::new(IngestionMetrics::new());
        adapter.start(tx, metrics.clone());

        let mut received = Vec::new();
        for _ in 0..5 {
            // The script thread runs at full speed; recv with a deadline
            let deadline = std::time::Instant::now() + Duration::from_secs(1);
            loop {
                match rx.try_recv() {
                    Ok(sample) => {
                        received.push(sample.time_ms);
                        break;
                    }
                    Err(_) if std::time::Instant::now() < deadline => {
                        thread::sleep(Duration::from_millis(1))
                    }
                    Err(e) => panic!("recv timed out: {e}"),
                }
            }
        }

        assert_eq!(received, vec![0, 10, 20, 30, 40]);
        assert_eq!(metrics.snapshot().samples_received, 5);
    }

    #[test]
    fn full_channel_drops_and_counts() {
        let script: Vec<_> = (0..10).map(|i| sample_at(i)).collect();
        let adapter = CallbackSourceAdapter::new(
            "imu".to_string(),
            Box::new(ScriptedSource::new("imu", script)),
            BackpressureConfig::new(2, DropPolicy::DropNewest),
        );

        // Nobody drains the channel: capacity 2, 10 samples
        let (tx, rx) = bounded(2);
        let metrics = Arc::new(IngestionMetrics::new());
        adapter.start(tx, metrics.clone());

        thread::sleep(Duration::from_millis(50));

        assert_eq!(rx.len(), 2);
        assert_eq!(metrics.snapshot().samples_dropped, 8);
    }

    #[test]
    fn stop_halts_forwarding() {
        let script: Vec<_> = (0..1000).map(|i| sample_at(i)).collect();
        let adapter = CallbackSourceAdapter::new(
            "imu".to_string(),
            Box::new(ScriptedSource::new("imu", script)),
            BackpressureConfig::default(),
        );

        let (tx, rx) = bounded(2000);
        adapter.start(tx, Arc::new(IngestionMetrics::new()));
        adapter.stop();
        assert!(!adapter.is_listening());

        thread::sleep(Duration::from_millis(20));
        // The callback gate closes immediately on stop; at most the
        // in-flight samples made it through
        assert!(rx.len() < 1000);
    }
}
