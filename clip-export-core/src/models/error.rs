use thiserror::Error;

/// Errors that can occur during a clip export action.
///
/// Every variant is terminal for the current action; nothing is retried
/// automatically and no bytes reach the sink once one of these is raised.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExportError {
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("invalid audio buffer: {0}")]
    InvalidBuffer(String),

    #[error("render failed: {0}")]
    RenderFailure(String),

    #[error("region resolves to zero samples")]
    EmptyRegion,

    #[error("encoded data size {data_bytes} bytes exceeds the WAV header limit")]
    EncodeOverflow { data_bytes: u64 },

    #[error("an export is already in progress for this source")]
    ExportInProgress,

    #[error("no audio source loaded")]
    NoSourceLoaded,

    #[error("export cancelled")]
    Cancelled,

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),
}
