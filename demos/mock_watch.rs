//! Mock Watch Demo
//!
//! Demonstrates the full pipeline against the mock IMU: driving profile,
//! log sink, 100 samples, no configuration file needed.
//!
//! Run with: cargo run -p mock_watch

use std::collections::HashMap;

use contracts::{
    DetectionSettings, MotionEvent, MotionProfile, MovementSettings, SinkConfig, SinkType,
    StopSettings, TamperSettings, TippingSettings,
};
use detection_engine::MotionMonitor;
use ingestion::IngestionPipeline;
use source_factory::{MockImuConfig, MockImuSource};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting Mock Watch Demo");

    // ==== Stage 1: Detection settings ====
    let settings = DetectionSettings {
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
    };

    // ==== Stage 2: Mock source + ingestion ====
    let source = MockImuSource::new(
        "demo_imu".to_string(),
        MockImuConfig {
            frequency_hz: 50.0,
            profile: MotionProfile::Driving,
            offsets: Default::default(),
        },
    );

    let mut ingestion = IngestionPipeline::new(128);
    ingestion.register_source("demo_imu".to_string(), Box::new(source), None);
    let samples = ingestion
        .take_receiver()
        .expect("receiver already taken");

    // ==== Stage 3: Engine + dispatcher ====
    let monitor = MotionMonitor::with_settings(settings);

    let (event_tx, event_rx) = mpsc::channel::<MotionEvent>(64);
    let sinks = vec![SinkConfig {
        name: "demo_log".to_string(),
        sink_type: SinkType::Log,
        queue_capacity: 64,
        params: HashMap::new(),
    }];
    let dispatcher = dispatcher::create_dispatcher(sinks, event_rx)?;
    let dispatcher_handle = dispatcher.spawn();

    // ==== Stage 4: Run ====
    ingestion.start_all();
    tracing::info!("Pipeline running, processing 100 samples...");

    let mut processed = 0u32;
    while processed < 100 {
        let Ok(sample) = samples.recv().await else {
            break;
        };
        for event in monitor.add_measurement(sample) {
            tracing::info!(kind = event.kind(), "confirmed");
            let _ = event_tx.send(event).await;
        }
        processed += 1;
    }

    // ==== Stage 5: Shutdown ====
    ingestion.stop_all();
    monitor.reset_measurements();
    drop(event_tx);
    dispatcher_handle.await?;

    tracing::info!(
        state = %monitor.device_state(),
        moving = monitor.moving_state(),
        "Demo finished"
    );

    Ok(())
}
