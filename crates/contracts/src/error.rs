//! Layered error definitions
//!
//! Categorized by source: config / source / engine / sink

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Source Errors =====
    /// Sample source failed to start
    #[error("source '{source_id}' start error: {message}")]
    SourceStart { source_id: String, message: String },

    /// Replay log could not be loaded
    #[error("replay load error for '{path}': {message}")]
    ReplayLoad { path: String, message: String },

    /// Calibration is not supported by the source
    #[error("source '{source_id}' does not support calibration")]
    CalibrationUnsupported { source_id: String },

    // ===== Engine Errors =====
    /// Shared state is unavailable; operations degrade to defaults
    #[error("engine state not ready")]
    NotReady,

    /// Query against an empty sample history
    #[error("sample history is empty")]
    EmptyHistory,

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create source start error
    pub fn source_start(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceStart {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Create replay load error
    pub fn replay_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReplayLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
