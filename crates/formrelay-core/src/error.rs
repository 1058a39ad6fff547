//! Error types for FormRelay

use thiserror::Error;

/// Core FormRelay errors
#[derive(Error, Debug)]
pub enum FormError {
    // Usage errors (broken templates, fail fast)
    #[error("Duplicate form name in request: {0}")]
    DuplicateFormName(String),

    #[error("Parameter directive used outside a submission element")]
    ParameterOutsideSubmission,

    #[error("Composite key input '{input}' collides with its own key '{key}'")]
    CompositeKeyCollision { input: String, key: String },

    // Hidden state errors
    #[error("Malformed hidden state: {0}")]
    MalformedHiddenState(String),

    #[error("Hidden state buffer too short: expected {expected}, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Hidden state encoding failed")]
    EncodingFailed,

    #[error("Hidden state decryption failed")]
    DecryptionFailed,

    // Client protocol errors
    #[error("Unknown submit action: {0}")]
    UnknownSubmitAction(String),

    #[error("Unknown display method: {0}")]
    UnknownDisplayMethod(String),

    #[error("Metadata serialization failed: {0}")]
    MetadataSerialization(String),
}

/// Result type for FormRelay operations
pub type FormResult<T> = Result<T, FormError>;
