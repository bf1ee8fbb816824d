// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Plaintext ⇄ bitstream codec.
//!
//! ```text
//! encode:  text ──compress──▶ bits ──pack──▶ bytes ──encrypt──▶ bytes ──expand──▶ Bitstream
//! decode:  Bitstream ──pack──▶ bytes ──decrypt──▶ bytes ──expand──▶ bits ──decompress──▶ text
//! ```
//!
//! The codec is stateless and performs no I/O. Every call takes an explicit
//! [`CodecConfig`]; there is no default key.

use core::fmt;

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::stego::bits::Bitstream;
use crate::stego::compress::CompressionMethod;
use crate::stego::crypto::{self, CipherMode};
use crate::stego::error::StegoError;

/// Compression and cipher parameters for one request.
///
/// Immutable once built. The key is wiped from memory on drop.
#[derive(Clone)]
pub struct CodecConfig {
    compression: CompressionMethod,
    mode: CipherMode,
    key: Zeroizing<Vec<u8>>,
    key_length: usize,
    iv: Option<Vec<u8>>,
}

impl CodecConfig {
    /// Build a validated configuration.
    ///
    /// `key_length` is in bits and must equal `key.len() * 8`. `iv` must be
    /// present exactly when `mode` requires one.
    ///
    /// # Errors
    /// [`StegoError::KeyLengthMismatch`] or [`StegoError::IvMismatch`].
    pub fn new(
        compression: CompressionMethod,
        mode: CipherMode,
        key: &[u8],
        key_length: usize,
        iv: Option<&[u8]>,
    ) -> Result<Self, StegoError> {
        mode.validate(key, key_length, iv)?;
        Ok(Self {
            compression,
            mode,
            key: Zeroizing::new(key.to_vec()),
            key_length,
            iv: iv.map(<[u8]>::to_vec),
        })
    }

    /// Build a configuration from textual method and mode tags.
    ///
    /// # Errors
    /// [`StegoError::UnsupportedMethod`] for unknown tags, plus the errors of
    /// [`CodecConfig::new`].
    pub fn from_tags(
        compression: &str,
        mode: &str,
        key: &[u8],
        key_length: usize,
        iv: Option<&[u8]>,
    ) -> Result<Self, StegoError> {
        Self::new(compression.parse()?, mode.parse()?, key, key_length, iv)
    }

    /// Derive the key from a passphrase (Argon2id) instead of supplying it.
    pub fn with_passphrase(
        compression: CompressionMethod,
        mode: CipherMode,
        passphrase: &str,
        salt: &[u8],
        key_length: usize,
        iv: Option<&[u8]>,
    ) -> Result<Self, StegoError> {
        let key = crypto::derive_key(passphrase, salt, key_length)?;
        Self::new(compression, mode, &key, key_length, iv)
    }

    pub fn compression(&self) -> CompressionMethod {
        self.compression
    }

    pub fn mode(&self) -> CipherMode {
        self.mode
    }

    /// Key length in bits.
    pub fn key_length(&self) -> usize {
        self.key_length
    }

    pub fn iv(&self) -> Option<&[u8]> {
        self.iv.as_deref()
    }
}

impl fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecConfig")
            .field("compression", &self.compression)
            .field("mode", &self.mode)
            .field("key_length", &self.key_length)
            .field("iv", &self.iv.as_ref().map(Vec::len))
            .finish_non_exhaustive()
    }
}

/// Compress then encrypt `plaintext` into a bitstream.
///
/// # Errors
/// [`StegoError::KeyLengthMismatch`] or [`StegoError::IvMismatch`] if the
/// configuration does not satisfy its cipher mode.
pub fn encode(plaintext: &str, config: &CodecConfig) -> Result<Bitstream, StegoError> {
    config.mode.validate(&config.key, config.key_length, config.iv())?;

    let compressed = config.compression.compress(plaintext);
    debug!(method = %config.compression, bits = compressed.len(), "compressed plaintext");

    // Both compressors emit whole bytes.
    let bytes = compressed.to_bytes().unwrap_or_default();
    let ciphertext = crypto::encrypt(config.mode, &bytes, &config.key, config.iv())?;
    let bits = Bitstream::from_bytes(&ciphertext);
    debug!(mode = %config.mode, bits = bits.len(), "encrypted bitstream");
    Ok(bits)
}

/// Decrypt then decompress a bitstream produced by [`encode`].
///
/// # Errors
/// - [`StegoError::DecryptionFailure`] if the stream is not byte-aligned or
///   the cipher rejects it (bad padding, failed authentication).
/// - [`StegoError::DecompressionFailure`] if the decrypted bits are not a
///   valid stream for the compression method, typically after a wrong key
///   in an unauthenticated mode.
pub fn decode(bits: &Bitstream, config: &CodecConfig) -> Result<String, StegoError> {
    config.mode.validate(&config.key, config.key_length, config.iv())?;

    let ciphertext = bits.to_bytes().ok_or(StegoError::DecryptionFailure {
        mode: config.mode.name(),
        bits: bits.len(),
    })?;
    let plaintext = crypto::decrypt(config.mode, &ciphertext, &config.key, config.iv()).map_err(|e| {
        warn!(mode = %config.mode, bits = bits.len(), "decryption failed");
        e
    })?;
    debug!(bits = plaintext.len() * 8, "decrypted bitstream");

    config
        .compression
        .decompress(&Bitstream::from_bytes(&plaintext))
        .map_err(|e| {
            warn!(method = %config.compression, "decompression failed");
            e
        })
}
