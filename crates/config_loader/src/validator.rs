//! Configuration validation.
//!
//! Rules:
//! - device id non-empty
//! - frequency_hz > 0
//! - replay source requires a path
//! - speed_multiplier > 0
//! - sink names non-empty and unique
//! - ingest channel capacity > 0

use std::collections::HashSet;

use contracts::{ContractError, SourceKind, WatchBlueprint};

/// Validate a WatchBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &WatchBlueprint) -> Result<(), ContractError> {
    validate_device(blueprint)?;
    validate_source(blueprint)?;
    validate_ingest(blueprint)?;
    validate_sinks(blueprint)?;
    Ok(())
}

fn validate_device(blueprint: &WatchBlueprint) -> Result<(), ContractError> {
    if blueprint.device.id.is_empty() {
        return Err(ContractError::config_validation(
            "device.id",
            "device id cannot be empty",
        ));
    }
    Ok(())
}

fn validate_source(blueprint: &WatchBlueprint) -> Result<(), ContractError> {
    let source = &blueprint.source;

    if source.id.is_empty() {
        return Err(ContractError::config_validation(
            "source.id",
            "source id cannot be empty",
        ));
    }

    if source.frequency_hz <= 0.0 {
        return Err(ContractError::config_validation(
            "source.frequency_hz",
            format!("frequency_hz must be > 0, got {}", source.frequency_hz),
        ));
    }

    if source.kind == SourceKind::Replay {
        if source.replay.path.is_none() {
            return Err(ContractError::config_validation(
                "source.replay.path",
                "replay source requires a sample log path",
            ));
        }
        if source.replay.speed_multiplier <= 0.0 {
            return Err(ContractError::config_validation(
                "source.replay.speed_multiplier",
                format!(
                    "speed_multiplier must be > 0, got {}",
                    source.replay.speed_multiplier
                ),
            ));
        }
    }

    Ok(())
}

fn validate_ingest(blueprint: &WatchBlueprint) -> Result<(), ContractError> {
    if blueprint.ingest.channel_capacity == 0 {
        return Err(ContractError::config_validation(
            "ingest.channel_capacity",
            "channel capacity must be > 0",
        ));
    }
    Ok(())
}

fn validate_sinks(blueprint: &WatchBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, sink) in blueprint.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{idx}].name"),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(&sink.name) {
            return Err(ContractError::config_validation(
                format!("sinks[{idx}].name"),
                "duplicate sink name",
            ));
        }
        if sink.queue_capacity == 0 {
            return Err(ContractError::config_validation(
                format!("sinks[{}].queue_capacity", sink.name),
                "queue capacity must be > 0",
            ));
        }
    }
    Ok(())
}

/// Non-fatal findings worth surfacing to the operator
pub fn warnings(blueprint: &WatchBlueprint) -> Vec<String> {
    let mut out = Vec::new();

    if !blueprint.detection.any_configured() {
        out.push(
            "no detector has a non-zero minimum_samples; detection ticks will be skipped"
                .to_string(),
        );
    }
    if blueprint.sinks.is_empty() {
        out.push("no sinks configured; confirmed events will only reach observers".to_string());
    }

    out
}
