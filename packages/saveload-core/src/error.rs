//! Save/load error types.

use thiserror::Error;

/// Persistence operation errors.
#[derive(Error, Debug, Clone)]
pub enum SaveLoadError {
    /// Serialization method name not recognized
    #[error("Unsupported serialization method '{0}'")]
    UnsupportedMethod(String),

    /// Custom method requested before a custom format was registered
    #[error("Serialization method is Custom but no custom format was registered")]
    MissingCustomFormat,

    /// Empty key or salt handed to an encrypted method
    #[error("Invalid encryption credentials: {0}")]
    InvalidCredentials(&'static str),

    /// Ciphertext failed to decrypt under the given credentials
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Value could not be encoded by the selected method
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Stream contents did not decode into the requested type
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Operation invoked against a target that cannot support it
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// I/O error during a file operation
    #[error("I/O error: {0}")]
    Io(String),
}

impl SaveLoadError {
    /// Wraps an I/O error with the failing operation's context.
    pub(crate) fn io(context: &str, error: std::io::Error) -> Self {
        SaveLoadError::Io(format!("{}: {}", context, error))
    }
}
