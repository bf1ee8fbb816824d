// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the steganographic codec.
//!
//! [`StegoError`] covers all failure modes from tag parsing and key
//! validation through encryption, compression, and cover-text generation.
//! Every error is terminal to the call that produced it.

use core::fmt;

/// Which kind of tag failed to parse in [`StegoError::UnsupportedMethod`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Compression,
    Cipher,
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compression => f.write_str("compression method"),
            Self::Cipher => f.write_str("cipher mode"),
        }
    }
}

/// Errors that can occur while encoding, decoding, or embedding a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// The compression or cipher tag is not recognised.
    UnsupportedMethod { kind: MethodKind, name: String },
    /// The key does not match the declared key length or the mode's
    /// supported lengths. Lengths are in bits.
    KeyLengthMismatch { mode: &'static str, expected: usize, actual: usize },
    /// The IV is missing, unexpected, or has the wrong length for the mode.
    /// Lengths are in bytes; `expected == 0` means the mode takes no IV.
    IvMismatch { mode: &'static str, expected: usize, actual: Option<usize> },
    /// Passphrase key derivation failed (e.g. salt too short).
    KeyDerivation(String),
    /// The bitstream could not be decrypted (wrong key, truncated, misaligned).
    DecryptionFailure { mode: &'static str, bits: usize },
    /// The decrypted bits could not be decompressed back into text.
    DecompressionFailure { method: &'static str, bits: usize },
    /// The model's vocabulary is smaller than the candidate set.
    InsufficientVocabulary { required: usize, available: usize },
    /// There is nothing to embed.
    EmptyBitstream,
    /// The seed prompt is empty or tokenizes to nothing.
    EmptyPrompt,
    /// A bit value other than 0 or 1 was supplied at `position`.
    InvalidBit { position: usize },
    /// Chunk width outside `1..=MAX_CHUNK_WIDTH`.
    InvalidChunkWidth(u32),
    /// The language model forward pass could not be executed.
    ModelUnavailable(String),
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedMethod { kind, name } => write!(f, "unsupported {kind}: {name:?}"),
            Self::KeyLengthMismatch { mode, expected, actual } => {
                write!(f, "{mode} key length mismatch: expected {expected} bits, got {actual}")
            }
            Self::IvMismatch { mode, expected: 0, actual } => {
                write!(f, "{mode} takes no IV, got {} bytes", actual.unwrap_or(0))
            }
            Self::IvMismatch { mode, expected, actual: None } => {
                write!(f, "{mode} requires a {expected}-byte IV, none given")
            }
            Self::IvMismatch { mode, expected, actual: Some(n) } => {
                write!(f, "{mode} requires a {expected}-byte IV, got {n} bytes")
            }
            Self::KeyDerivation(msg) => write!(f, "key derivation failed: {msg}"),
            Self::DecryptionFailure { mode, bits } => {
                write!(f, "{mode} decryption failed on {bits}-bit stream (wrong key or corrupted data?)")
            }
            Self::DecompressionFailure { method, bits } => {
                write!(f, "{method} decompression failed on {bits}-bit stream")
            }
            Self::InsufficientVocabulary { required, available } => {
                write!(f, "vocabulary too small: need {required} candidates, model has {available}")
            }
            Self::EmptyBitstream => write!(f, "bitstream is empty, nothing to embed"),
            Self::EmptyPrompt => write!(f, "seed prompt is empty"),
            Self::InvalidBit { position } => write!(f, "invalid bit value at position {position}"),
            Self::InvalidChunkWidth(w) => write!(f, "chunk width {w} out of range"),
            Self::ModelUnavailable(msg) => write!(f, "language model unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StegoError {}

impl From<crate::stego::model::ModelError> for StegoError {
    fn from(e: crate::stego::model::ModelError) -> Self {
        Self::ModelUnavailable(e.to_string())
    }
}
