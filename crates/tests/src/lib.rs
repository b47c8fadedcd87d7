//! # Integration Tests
//!
//! End-to-end tests across the workspace crates.
//!
//! Covers:
//! - Full pipeline: mock source -> ingestion -> engine -> dispatcher
//! - Detection scenarios driven through the public monitor surface
//! - Shutdown ordering (stop sources, drain sinks, clear history)

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // Frozen ICD smoke check
        let _ = contracts::ConfigVersion::V1;
        let _ = contracts::DeviceState::Stopped;
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{
        AxisSample, ContractError, DetectionSettings, DeviceState, EventSink, MotionEvent,
        MotionProfile, MovementSettings, StopSettings, TamperSettings, TippingSettings, Vector3,
    };
    use detection_engine::MotionMonitor;
    use dispatcher::{Dispatcher, SinkHandle};
    use ingestion::IngestionPipeline;
    use source_factory::{MockImuConfig, MockImuSource};
    use tokio::sync::mpsc;

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

    /// Sink that counts writes per event kind
    struct CountingSink {
        name: String,
        movements: Arc<AtomicU64>,
        stops: Arc<AtomicU64>,
        total: Arc<AtomicU64>,
    }

    impl EventSink for CountingSink {
        fn name(&self) -> &str {
            &self.name
        }

        async fn write(&mut self, event: &MotionEvent) -> Result<(), ContractError> {
            self.total.fetch_add(1, Ordering::SeqCst);
            match event {
                MotionEvent::Movement(_) => {
                    self.movements.fetch_add(1, Ordering::SeqCst);
                }
                MotionEvent::Stop(_) => {
                    self.stops.fetch_add(1, Ordering::SeqCst);
                }
                _ => {}
            }
            Ok(())
        }

        async fn flush(&mut self) -> Result<(), ContractError> {
            Ok(())
        }

        async fn close(&mut self) -> Result<(), ContractError> {
            Ok(())
        }
    }

    fn moving_sample(time_ms: u64) -> AxisSample {
        AxisSample {
            time_ms,
            acc: Vector3::new(0.3, 1.0, 0.0),
            ..Default::default()
        }
    }

    fn resting_sample(time_ms: u64) -> AxisSample {
        AxisSample {
            time_ms,
            acc: Vector3::new(0.0, 1.0, 0.0),
            ..Default::default()
        }
    }

    /// End-to-end: scripted samples -> MotionMonitor -> Dispatcher
    ///
    /// Verifies the full event path:
    /// 1. The engine confirms movement, then a stop
    /// 2. The dispatcher fans both transitions out to the sink
    #[tokio::test]
    async fn test_e2e_drive_and_stop() {
        let monitor = MotionMonitor::with_settings(test_settings());

        let movements = Arc::new(AtomicU64::new(0));
        let stops = Arc::new(AtomicU64::new(0));
        let total = Arc::new(AtomicU64::new(0));

        let sink = CountingSink {
            name: "counting".to_string(),
            movements: Arc::clone(&movements),
            stops: Arc::clone(&stops),
            total: Arc::clone(&total),
        };

        let (event_tx, event_rx) = mpsc::channel::<MotionEvent>(100);
        let dispatcher = Dispatcher::with_handles(vec![SinkHandle::spawn(sink, 50)], event_rx);
        let dispatcher_handle = dispatcher.spawn();

        // Drive for 20 ticks, then rest until the stop confirms
        for i in 0..20u64 {
            for event in monitor.add_measurement(moving_sample(i * 100)) {
                event_tx.send(event).await.unwrap();
            }
        }
        assert!(monitor.moving_state());

        for i in 0..10u64 {
            for event in monitor.add_measurement(resting_sample(2_000 + i * 100)) {
                event_tx.send(event).await.unwrap();
            }
        }
        assert!(!monitor.moving_state());
        assert_eq!(monitor.device_state(), DeviceState::Stopped);

        // Close the channel and let the dispatcher drain
        drop(event_tx);
        tokio::time::timeout(Duration::from_secs(2), dispatcher_handle)
            .await
            .expect("dispatcher drain timed out")
            .unwrap();

        assert_eq!(movements.load(Ordering::SeqCst), 1);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert_eq!(total.load(Ordering::SeqCst), 2);
    }

    /// Mock source through the ingestion funnel into the engine
    #[tokio::test]
    async fn test_e2e_mock_source_pipeline() {
        let source = MockImuSource::new(
            "imu".to_string(),
            MockImuConfig {
                frequency_hz: 500.0,
                profile: MotionProfile::Driving,
                offsets: Default::default(),
            },
        );

        let mut ingestion = IngestionPipeline::new(256);
        ingestion.register_source("imu".to_string(), Box::new(source), None);
        let rx = ingestion.take_receiver().unwrap();

        let monitor = MotionMonitor::with_settings(test_settings());

        ingestion.start_all();

        // Pump enough samples through the engine to confirm movement
        let pump = async {
            let mut processed = 0u64;
            while processed < 50 {
                if let Ok(sample) = rx.recv().await {
                    monitor.add_measurement(sample);
                    processed += 1;
                } else {
                    break;
                }
            }
            processed
        };

        let processed = tokio::time::timeout(Duration::from_secs(5), pump)
            .await
            .expect("pipeline timed out");

        ingestion.stop_all();

        assert_eq!(processed, 50);
        assert!(monitor.moving_state(), "driving profile must confirm movement");
        assert_eq!(monitor.device_state(), DeviceState::Moving);
        assert!(monitor.axis_data().time_ms > 0 || monitor.history_len() > 0);
    }

    /// Tipping scenario driven through the public surface
    #[tokio::test]
    async fn test_e2e_tipping_reports_context() {
        let monitor = MotionMonitor::with_settings(test_settings());

        // Fill the history with calm samples, then sustain a tipped
        // attitude until the streak confirms against the full buffer
        for i in 0..84u64 {
            monitor.add_measurement(resting_sample(i * 100));
        }
        let mut tipping_events = Vec::new();
        for i in 0..16u64 {
            let sample = AxisSample {
                roll: 120.0,
                pitch: 50.0,
                ..resting_sample(8_400 + i * 100)
            };
            tipping_events.extend(monitor.add_measurement(sample));
        }

        assert!(monitor.tipped_state());
        assert_eq!(monitor.device_state(), DeviceState::Tipped);
        assert_eq!(tipping_events.len(), 1);

        let data = monitor.tipping_data();
        assert_eq!(data.history.len(), 100);
        assert_eq!(data.start_time_ms, 8_400);
    }

    /// Stopping the producer clears the engine history
    #[tokio::test]
    async fn test_e2e_shutdown_clears_history() {
        let source = MockImuSource::new(
            "imu".to_string(),
            MockImuConfig {
                frequency_hz: 500.0,
                profile: MotionProfile::Stationary,
                offsets: Default::default(),
            },
        );

        let mut ingestion = IngestionPipeline::new(64);
        ingestion.register_source("imu".to_string(), Box::new(source), None);
        let rx = ingestion.take_receiver().unwrap();

        let monitor = MotionMonitor::with_settings(test_settings());
        ingestion.start_all();

        for _ in 0..10 {
            let sample = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("sample timed out")
                .expect("source closed early");
            monitor.add_measurement(sample);
        }
        assert_eq!(monitor.history_len(), 10);

        // Shutdown order: stop sources first, then clear the history
        ingestion.stop_all();
        monitor.reset_measurements();

        assert!(!ingestion.is_source_listening("imu"));
        assert_eq!(monitor.history_len(), 0);
        assert_eq!(monitor.axis_data(), AxisSample::default());
    }
}
