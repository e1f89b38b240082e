//! Error types for light field operations.

use thiserror::Error;

/// Error type for light field operations.
///
/// Every variant except [`Core`](OpsError::Core) is a usage error: it is
/// raised before any output is computed.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Wrong number of frames for the operation.
    #[error("{op} requires {expected} frame(s), got {got}")]
    FrameCount {
        /// Operation name.
        op: &'static str,
        /// Required frame count.
        expected: usize,
        /// Actual frame count.
        got: usize,
    },

    /// Wrong number of channels for the operation.
    #[error("{op} requires {expected} channel(s), got {got}")]
    ChannelCount {
        /// Operation name.
        op: &'static str,
        /// Required channel count.
        expected: usize,
        /// Actual channel count.
        got: usize,
    },

    /// Two inputs disagree on frame count.
    #[error("frame mismatch: light field has {lightfield} frames, map has {map}")]
    FrameMismatch {
        /// Light field frame count.
        lightfield: usize,
        /// Coordinate map frame count.
        map: usize,
    },

    /// Error from the core image types.
    #[error(transparent)]
    Core(#[from] lfx_core::Error),
}

/// Result type for light field operations.
pub type OpsResult<T> = Result<T, OpsError>;
