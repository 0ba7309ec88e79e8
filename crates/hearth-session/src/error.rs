//! Error types for session operations.

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The signing key was never changed away from the built-in placeholder.
    #[error("Session key unset: configure a session key before issuing sessions")]
    SessionKeyUnset,

    /// The signing key is not a valid AES-256 key.
    #[error("Invalid session key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// The AEAD primitive failed while sealing.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// The operating system RNG could not supply random bytes.
    #[error("Entropy source failed: {0}")]
    Entropy(String),

    /// Armored text was not valid base64.
    #[error("Encoding error: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// Ciphertext is shorter than the nonce prefix.
    #[error("Ciphertext too short: {len} bytes, need at least {min}")]
    CiphertextTooShort { len: usize, min: usize },

    /// AEAD tag check failed (tampered ciphertext or wrong key).
    #[error("Authentication failed")]
    Authentication,

    /// Decrypted block does not carry the identifier marker.
    #[error("Invalid session identifier")]
    InvalidIdentifier,

    /// A freshly generated identifier collided with a live session.
    #[error("Session identifier already in use")]
    IdentifierInUse,

    /// A valid identifier has no session in the store.
    #[error("Session not found: {0}")]
    IdentifierMissing(String),

    /// Error from the backing store.
    #[error("Store error: {0}")]
    Store(String),
}

impl Error {
    /// Whether this error means "the presented identifier is not acceptable".
    ///
    /// The manager collapses all of these into "no session" so a client can
    /// never tell which validation step failed.
    pub fn is_rejected_identifier(&self) -> bool {
        matches!(
            self,
            Error::Encoding(_)
                | Error::CiphertextTooShort { .. }
                | Error::Authentication
                | Error::InvalidIdentifier
        )
    }
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, Error>;
