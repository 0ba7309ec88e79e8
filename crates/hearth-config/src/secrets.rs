//! Session key resolution.
//!
//! Resolution order:
//! 1. Environment variable (`HEARTH_SESSION_KEY`)
//! 2. Config file `[session] key` (with warning)
//!
//! Keys are standard base64 encodings of exactly 32 bytes.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{ConfigError, Result};

/// Environment variable holding the session key.
pub const SESSION_KEY_ENV: &str = "HEARTH_SESSION_KEY";

/// Required decoded key length in bytes.
pub const SESSION_KEY_LEN: usize = 32;

/// Where a secret was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Environment variable.
    EnvVar(String),
    /// Config file (plaintext, not recommended).
    ConfigFile,
}

impl std::fmt::Display for SecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretSource::EnvVar(var) => write!(f, "env var {}", var),
            SecretSource::ConfigFile => write!(f, "config file (plaintext)"),
        }
    }
}

/// A decoded session key with provenance.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    /// Raw key bytes.
    pub bytes: Vec<u8>,
    /// Where the key was found.
    pub source: SecretSource,
}

impl std::fmt::Debug for ResolvedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedKey")
            .field("bytes", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Resolve the session key from the process environment, then `config_value`.
///
/// Returns `Ok(None)` when no key is configured anywhere. A key that is present
/// but malformed is an error rather than a fallthrough.
pub fn resolve_session_key(config_value: Option<&str>) -> Result<Option<ResolvedKey>> {
    resolve_session_key_with(|name| std::env::var(name).ok(), config_value)
}

/// [`resolve_session_key`] with an explicit environment lookup.
pub fn resolve_session_key_with(
    env: impl Fn(&str) -> Option<String>,
    config_value: Option<&str>,
) -> Result<Option<ResolvedKey>> {
    if let Some(value) = env(SESSION_KEY_ENV)
        && !value.is_empty()
    {
        let source = SecretSource::EnvVar(SESSION_KEY_ENV.to_string());
        let bytes = decode_session_key(&value, &source)?;
        return Ok(Some(ResolvedKey { bytes, source }));
    }

    match config_value {
        Some(value) if !value.is_empty() => {
            let source = SecretSource::ConfigFile;
            let bytes = decode_session_key(value, &source)?;
            Ok(Some(ResolvedKey { bytes, source }))
        }
        _ => Ok(None),
    }
}

/// Decode a base64 session key and check its length.
pub fn decode_session_key(encoded: &str, source: &SecretSource) -> Result<Vec<u8>> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ConfigError::InvalidSessionKey {
            source_name: source.to_string(),
            reason: e.to_string(),
        })?;

    if bytes.len() != SESSION_KEY_LEN {
        return Err(ConfigError::InvalidSessionKey {
            source_name: source.to_string(),
            reason: format!(
                "expected {} bytes, got {}",
                SESSION_KEY_LEN,
                bytes.len()
            ),
        });
    }
    Ok(bytes)
}

/// Encode raw key bytes for use in the env var or config file.
pub fn encode_session_key(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
