//! Error types for configuring and filling targets

use thiserror::Error;

/// Errors raised while resolving a fill configuration or generating a value
#[derive(Debug, Error)]
pub enum FillError {
    /// The argument following the option overlays has an unsupported shape
    #[error(
        "Invalid fill argument ({0}): expected an options object, an array to pick from, \
         a generator, or the name of a value source operation"
    )]
    InvalidHead(String),

    /// A named operation is not provided by the value source
    #[error("Unknown value source operation: {0}")]
    UnknownOperation(String),

    /// Trailing arguments do not fit the operation they are bound to
    #[error("Invalid arguments for '{operation}': {reason}")]
    InvalidArgument { operation: String, reason: String },

    /// The value source failed to produce a value
    #[error("Value source error: {0}")]
    Source(String),
}

impl FillError {
    /// True for the errors a caller gets back for a malformed `configure` call
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::InvalidHead(_) | Self::UnknownOperation(_))
    }
}

/// Result type alias for fill operations
pub type FillResult<T> = Result<T, FillError>;
