//! Replay source - plays back recorded sample logs
//!
//! Reads JSONL files (one `AxisSample` per line, as written by the
//! dispatcher's file sink or any external recorder) and re-delivers the
//! samples paced by their original timestamps.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use contracts::{AxisSample, ContractError, ImuOffsets, SampleCallback, SampleSource};
use tracing::{debug, info, warn};

use crate::error::{Result, SourceFactoryError};

/// Replay playback options
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Playback speed multiplier (1.0 = original pacing)
    pub speed_multiplier: f64,

    /// Restart from the beginning when the log is exhausted
    pub loop_playback: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            loop_playback: false,
        }
    }
}

/// Replay source - delivers recorded samples through the callback
pub struct ReplaySource {
    source_id: String,
    samples: Vec<AxisSample>,
    options: ReplayOptions,
    offsets: ImuOffsets,
    listening: Arc<AtomicBool>,
    thread_handle: Mutex<Option<JoinHandle<()>>>,
}

impl ReplaySource {
    /// Load a sample log
    ///
    /// Blank lines are skipped; samples are sorted by timestamp so
    /// hand-edited logs still play back in order.
    pub fn load(
        path: &Path,
        source_id: String,
        options: ReplayOptions,
        offsets: ImuOffsets,
    ) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| SourceFactoryError::replay_load(path.display().to_string(), e.to_string()))?;
        let reader = BufReader::new(file);

        let mut samples = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|e| {
                SourceFactoryError::replay_load(path.display().to_string(), e.to_string())
            })?;
            if line.is_empty() {
                continue;
            }

            let sample: AxisSample = serde_json::from_str(&line).map_err(|e| {
                SourceFactoryError::replay_load(path.display().to_string(), e.to_string())
            })?;
            samples.push(sample);
        }

        samples.sort_by_key(|sample| sample.time_ms);

        info!(
            source_id = %source_id,
            samples = samples.len(),
            "loaded replay log"
        );

        Ok(Self {
            source_id,
            samples,
            options,
            offsets,
            listening: Arc::new(AtomicBool::new(false)),
            thread_handle: Mutex::new(None),
        })
    }

    /// Number of samples loaded
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the log held no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl SampleSource for ReplaySource {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn listen(&self, callback: SampleCallback) {
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }

        let listening = self.listening.clone();
        let source_id = self.source_id.clone();
        let samples = self.samples.clone();
        let speed = self.options.speed_multiplier.max(0.1);
        let loop_playback = self.options.loop_playback;

        let handle = thread::spawn(move || {
            debug!(source_id = %source_id, "replay thread started");

            loop {
                if samples.is_empty() {
                    warn!(source_id = %source_id, "no samples to replay");
                    break;
                }

                let start_time = Instant::now();
                let first_time_ms = samples[0].time_ms;

                for sample in &samples {
                    let offset_ms = sample.time_ms - first_time_ms;
                    let target_elapsed =
                        Duration::from_secs_f64(offset_ms as f64 / 1000.0 / speed);

                    // Sleep in short slices so a stop request is honored
                    // promptly even across long gaps in the log
                    loop {
                        if !listening.load(Ordering::Relaxed) {
                            debug!(source_id = %source_id, "replay stopped");
                            return;
                        }
                        let actual_elapsed = start_time.elapsed();
                        if actual_elapsed >= target_elapsed {
                            break;
                        }
                        thread::sleep((target_elapsed - actual_elapsed).min(Duration::from_millis(20)));
                    }

                    callback(*sample);
                }

                if !loop_playback {
                    info!(source_id = %source_id, "replay completed");
                    break;
                }

                debug!(source_id = %source_id, "looping replay");
            }

            listening.store(false, Ordering::SeqCst);
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

    fn calibrate(&self) -> std::result::Result<ImuOffsets, ContractError> {
        Ok(self.offsets)
    }
}
