//! Source Factory error types

use contracts::ContractError;
use thiserror::Error;

/// Source Factory specific error
#[derive(Debug, Error)]
pub enum SourceFactoryError {
    /// Replay selected without a sample log path
    #[error("replay source '{source_id}' has no sample log path configured")]
    MissingReplayPath { source_id: String },

    /// Replay log could not be loaded
    #[error("failed to load replay log '{path}': {message}")]
    ReplayLoad { path: String, message: String },

    /// Wrapped ContractError
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl SourceFactoryError {
    /// Create replay load error
    pub fn replay_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReplayLoad {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, SourceFactoryError>;
