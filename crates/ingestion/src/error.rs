//! Ingestion error types

use thiserror::Error;

/// Ingestion error
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Channel already taken or closed
    #[error("channel closed for source {source_id}")]
    ChannelClosed {
        /// Source ID
        source_id: String,
    },

    /// Source is not listening
    #[error("source {source_id} is not listening")]
    SourceNotListening {
        /// Source ID
        source_id: String,
    },

    /// Source is already listening
    #[error("source {source_id} is already listening")]
    AlreadyListening {
        /// Source ID
        source_id: String,
    },
}

/// Ingestion Result type alias
pub type Result<T> = std::result::Result<T, IngestionError>;
