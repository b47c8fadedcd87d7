//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    device: DeviceInfo,
    source: SourceInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    detectors: Option<DetectorInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sinks: Vec<SinkInfo>,
}

#[derive(Serialize)]
struct DeviceInfo {
    id: String,
    sample_period_ms: u64,
}

#[derive(Serialize)]
struct SourceInfo {
    id: String,
    kind: String,
    frequency_hz: f64,
    profile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    replay_path: Option<String>,
}

#[derive(Serialize)]
struct DetectorInfo {
    tipping: DetectorEntry,
    movement: DetectorEntry,
    stop: DetectorEntry,
    tamper: DetectorEntry,
}

#[derive(Serialize)]
struct DetectorEntry {
    minimum_samples: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    threshold_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    interval_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_window_s: Option<u64>,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    sink_type: String,
    queue_capacity: usize,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn build_config_info(blueprint: &contracts::WatchBlueprint, args: &InfoArgs) -> ConfigInfo {
    let detection = &blueprint.detection;
    let detectors = args.detectors.then(|| DetectorInfo {
        tipping: DetectorEntry {
            minimum_samples: detection.tipping.minimum_samples,
            threshold_deg: Some(detection.tipping.start_threshold_deg),
            interval_g: None,
            time_window_s: None,
        },
        movement: DetectorEntry {
            minimum_samples: detection.movement.minimum_samples,
            threshold_deg: None,
            interval_g: Some(detection.movement.interval_g),
            time_window_s: None,
        },
        stop: DetectorEntry {
            minimum_samples: detection.stop.minimum_samples,
            threshold_deg: None,
            interval_g: Some(detection.stop.interval_g),
            time_window_s: None,
        },
        tamper: DetectorEntry {
            minimum_samples: detection.tamper.minimum_samples,
            threshold_deg: None,
            interval_g: None,
            time_window_s: Some(detection.tamper.time_window_s),
        },
    });

    let sinks = if args.sinks {
        blueprint
            .sinks
            .iter()
            .map(|s| SinkInfo {
                name: s.name.clone(),
                sink_type: format!("{:?}", s.sink_type),
                queue_capacity: s.queue_capacity,
            })
            .collect()
    } else {
        Vec::new()
    };

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        device: DeviceInfo {
            id: blueprint.device.id.clone(),
            sample_period_ms: blueprint.device.sample_period_ms,
        },
        source: SourceInfo {
            id: blueprint.source.id.clone(),
            kind: format!("{:?}", blueprint.source.kind),
            frequency_hz: blueprint.source.frequency_hz,
            profile: format!("{:?}", blueprint.source.profile),
            replay_path: blueprint
                .source
                .replay
                .path
                .as_ref()
                .map(|p| p.display().to_string()),
        },
        detectors,
        sinks,
    }
}

fn print_config_info(blueprint: &contracts::WatchBlueprint, args: &InfoArgs) {
    println!("Configuration: {:?}", blueprint.version);
    println!("\nDevice:");
    println!("  Id: {}", blueprint.device.id);
    println!("  Sample period: {} ms", blueprint.device.sample_period_ms);

    println!("\nSource:");
    println!("  Id: {}", blueprint.source.id);
    println!("  Kind: {:?}", blueprint.source.kind);
    println!("  Frequency: {} Hz", blueprint.source.frequency_hz);
    println!("  Profile: {:?}", blueprint.source.profile);

    if args.detectors {
        let detection = &blueprint.detection;
        println!("\nDetectors:");
        println!(
            "  Tipping: min_samples={}, threshold={}°",
            detection.tipping.minimum_samples, detection.tipping.start_threshold_deg
        );
        println!(
            "  Movement: min_samples={}, interval={} g",
            detection.movement.minimum_samples, detection.movement.interval_g
        );
        println!(
            "  Stop: min_samples={}, interval={} g",
            detection.stop.minimum_samples, detection.stop.interval_g
        );
        println!(
            "  Tamper: min_samples={}, window={} s",
            detection.tamper.minimum_samples, detection.tamper.time_window_s
        );
    }

    if args.sinks && !blueprint.sinks.is_empty() {
        println!("\nSinks ({}):", blueprint.sinks.len());
        for sink in &blueprint.sinks {
            println!(
                "  - {} ({:?}, queue={})",
                sink.name, sink.sink_type, sink.queue_capacity
            );
        }
    }
}
