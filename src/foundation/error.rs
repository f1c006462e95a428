/// Convenience result type used across the crate.
pub type ClipResult<T> = Result<T, ClipError>;

/// Error taxonomy for the decoding pipeline.
///
/// Only [`ClipError::InvalidFrameRate`], [`ClipError::SourceInit`] and
/// [`ClipError::Validation`] are ever returned to timeline callers. Decode failures and
/// protocol violations are absorbed at the session boundary; the variants exist so the
/// session can log and report them uniformly.
#[derive(thiserror::Error, Debug)]
pub enum ClipError {
    /// Frame rate below 1 (or NaN) passed to a time conversion.
    #[error("invalid frame rate: {0} (must be >= 1)")]
    InvalidFrameRate(f64),

    /// The live-playback element could not load the source media.
    #[error("source init failure: {0}")]
    SourceInit(String),

    /// The decode worker reported an unrecoverable failure.
    #[error("decode failure: {0}")]
    Decode(String),

    /// The decode worker emitted a message the session does not understand.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// Invalid configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClipError {
    /// Build a [`ClipError::SourceInit`] value.
    pub fn source_init(msg: impl Into<String>) -> Self {
        Self::SourceInit(msg.into())
    }

    /// Build a [`ClipError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ClipError::Protocol`] value.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Build a [`ClipError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
