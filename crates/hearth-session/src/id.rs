//! Session identifier generation and validation.
//!
//! An identifier is `armor(encrypt(block))` where `block` is random bytes
//! whose tail is overwritten with [`SID_MARKER`]. Identifiers are therefore
//! self-certifying: forging one requires breaking the AEAD.

use crate::crypto;
use crate::error::{Error, Result};

/// Length of the plaintext block sealed into an identifier.
pub const SID_BLOCK_LEN: usize = 32;

/// Marker occupying the last bytes of every identifier block.
pub const SID_MARKER: &[u8] = b"Kitty";

/// Generate a fresh identifier sealed under `key`.
pub fn generate_session_id(key: &[u8]) -> Result<String> {
    let mut block = [0u8; SID_BLOCK_LEN];
    crypto::fill_random(&mut block)?;
    block[SID_BLOCK_LEN - SID_MARKER.len()..].copy_from_slice(SID_MARKER);
    seal_block(&block, key)
}

pub(crate) fn seal_block(block: &[u8], key: &[u8]) -> Result<String> {
    let sealed = crypto::encrypt(block, key)?;
    Ok(crypto::armor(&sealed))
}

/// Validate an identifier and return its plaintext block.
///
/// Fails with [`Error::Encoding`], [`Error::CiphertextTooShort`],
/// [`Error::Authentication`] or [`Error::InvalidIdentifier`].
pub fn validate_session_id(id: &str, key: &[u8]) -> Result<Vec<u8>> {
    let sealed = crypto::dearmor(id)?;
    let block = crypto::decrypt(&sealed, key)?;

    if block.len() < SID_MARKER.len() {
        return Err(Error::InvalidIdentifier);
    }
    let tail = &block[block.len() - SID_MARKER.len()..];
    if !crypto::constant_time_eq(tail, SID_MARKER) {
        return Err(Error::InvalidIdentifier);
    }

    Ok(block)
}
