//! Error types and result aliases.
//!
//! Defines the `SessionError` enumeration and common `Result` type.
//! Every variant is a configuration-time failure: bad cookies at request
//! time are recovered as empty sessions, never surfaced as errors.

use thiserror::Error;

/// Session configuration and lookup errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Neither a key nor a secret was configured.
    #[error("key or secret must be specified")]
    MissingKeyMaterial,

    /// The configured secret is shorter than the minimum.
    #[error("secret must be at least {min} bytes, got {actual}")]
    SecretTooShort { min: usize, actual: usize },

    /// The configured salt does not have the required length.
    #[error("salt must be exactly {expected} bytes, got {actual}")]
    BadSaltLength { expected: usize, actual: usize },

    /// A configured key does not have the required length.
    #[error("key must be exactly {expected} bytes, got {actual}")]
    BadKeyLength { expected: usize, actual: usize },

    /// A configured key is not valid base64 text.
    #[error("key is not valid base64: {0}")]
    BadKeyEncoding(#[from] base64::DecodeError),

    /// Passphrase hashing failed.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Encode/decode was requested for a session name that was never registered.
    #[error("no session registered under name '{0}'")]
    UnknownSession(String),

    /// Two session entries were registered under the same name.
    #[error("duplicate session name '{0}'")]
    DuplicateSession(String),

    /// Session payload serialization failed.
    #[error("session payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for `SessionError`.
pub type Result<T> = std::result::Result<T, SessionError>;
