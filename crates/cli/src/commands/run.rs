//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(profile) = args.profile {
        info!(profile = ?profile, "Overriding motion profile from CLI");
        blueprint.source.profile = profile.into();
    }

    info!(
        device = %blueprint.device.id,
        source = %blueprint.source.id,
        kind = ?blueprint.source.kind,
        sinks = blueprint.sinks.len(),
        "Configuration loaded"
    );

    for warning in config_loader::warnings(&blueprint) {
        warn!(warning = %warning, "Configuration warning");
    }

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    // Build pipeline configuration
    let pipeline_config = PipelineConfig {
        blueprint,
        max_samples: if args.max_samples == 0 {
            None
        } else {
            Some(args.max_samples)
        },
        timeout: if args.timeout == 0 {
            None
        } else {
            Some(Duration::from_secs(args.timeout))
        },
        buffer_size: args.buffer_size,
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    // Create and run pipeline
    let pipeline = Pipeline::new(pipeline_config);

    // Setup graceful shutdown handler
    let shutdown_signal = setup_shutdown_signal();

    info!("Starting pipeline...");

    // Run pipeline with shutdown signal
    tokio::select! {
        result = pipeline.run() => {
            match result {
                Ok(stats) => {
                    info!(
                        samples = stats.samples_processed,
                        events = stats.events_confirmed,
                        duration_secs = stats.duration.as_secs_f64(),
                        sps = format!("{:.2}", stats.samples_per_second()),
                        "Pipeline completed successfully"
                    );

                    // Print detailed statistics
                    stats.print_summary();
                }
                Err(e) => {
                    return Err(e).context("Pipeline execution failed");
                }
            }
        }
        _ = shutdown_signal => {
            warn!("Received shutdown signal, stopping pipeline...");
        }
    }

    info!("tiltwatch finished");
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &contracts::WatchBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Device:");
    println!("  Id: {}", blueprint.device.id);
    println!("  Sample period: {} ms", blueprint.device.sample_period_ms);

    println!("\nSource:");
    println!("  Id: {} ({:?})", blueprint.source.id, blueprint.source.kind);
    println!("  Frequency: {} Hz", blueprint.source.frequency_hz);
    println!("  Profile: {:?}", blueprint.source.profile);
    if let Some(ref path) = blueprint.source.replay.path {
        println!("  Replay log: {}", path.display());
    }

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

    if !blueprint.sinks.is_empty() {
        println!("\nSinks ({}):", blueprint.sinks.len());
        for sink in &blueprint.sinks {
            println!("  - {} ({:?})", sink.name, sink.sink_type);
        }
    }

    println!();
}
