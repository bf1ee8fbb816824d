// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Settings file.
//!
//! ```toml
//! [encryption]
//! cipher_mode = "OFB"
//! key_length = 128
//!
//! [compression]
//! method = "utf8"
//!
//! [generation]
//! chunk_width = 4
//! max_terminal_marks = 2
//! max_words = 20
//! ```
//!
//! Every section and field is optional. Keys and IVs are never read from
//! the file; [`Settings::codec_config`] takes them from the caller.

use core::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::stego::bits::{validate_chunk_width, DEFAULT_CHUNK_WIDTH};
use crate::stego::codec::CodecConfig;
use crate::stego::encoder::StopPolicy;
use crate::stego::error::StegoError;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(StegoError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read settings: {e}"),
            Self::Parse(e) => write!(f, "malformed settings: {e}"),
            Self::Invalid(e) => write!(f, "invalid settings: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<StegoError> for ConfigError {
    fn from(e: StegoError) -> Self {
        Self::Invalid(e)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EncryptionSettings {
    pub cipher_mode: String,
    /// Bits.
    pub key_length: usize,
}

impl Default for EncryptionSettings {
    fn default() -> Self {
        Self { cipher_mode: "OFB".to_string(), key_length: 128 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CompressionSettings {
    pub method: String,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self { method: "utf8".to_string() }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GenerationSettings {
    pub chunk_width: u32,
    pub max_terminal_marks: usize,
    pub max_words: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        let stop = StopPolicy::default();
        Self {
            chunk_width: DEFAULT_CHUNK_WIDTH,
            max_terminal_marks: stop.max_terminal_marks,
            max_words: stop.max_words,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub encryption: EncryptionSettings,
    pub compression: CompressionSettings,
    pub generation: GenerationSettings,
}

impl Settings {
    /// Parse settings from TOML text and check the tags and chunk width.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), StegoError> {
        self.encryption.cipher_mode.parse::<crate::stego::CipherMode>()?;
        self.compression.method.parse::<crate::stego::CompressionMethod>()?;
        validate_chunk_width(self.generation.chunk_width)
    }

    pub fn stop_policy(&self) -> StopPolicy {
        StopPolicy {
            max_terminal_marks: self.generation.max_terminal_marks,
            max_words: self.generation.max_words,
        }
    }

    pub fn chunk_width(&self) -> u32 {
        self.generation.chunk_width
    }

    /// Combine the configured tags with a caller-supplied key and IV.
    pub fn codec_config(&self, key: &[u8], iv: Option<&[u8]>) -> Result<CodecConfig, StegoError> {
        CodecConfig::from_tags(
            &self.compression.method,
            &self.encryption.cipher_mode,
            key,
            self.encryption.key_length,
            iv,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stego::{CipherMode, CompressionMethod};

    #[test]
    fn empty_file_gives_defaults() {
        let s = Settings::from_toml_str("").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.chunk_width(), 4);
        assert_eq!(s.stop_policy(), StopPolicy::default());
    }

    #[test]
    fn full_file() {
        let s = Settings::from_toml_str(
            r#"
            [encryption]
            cipher_mode = "GCM-SIV"
            key_length = 256

            [compression]
            method = "brotli"

            [generation]
            chunk_width = 3
            max_terminal_marks = 1
            max_words = 12
            "#,
        )
        .unwrap();
        assert_eq!(s.chunk_width(), 3);
        assert_eq!(s.stop_policy(), StopPolicy { max_terminal_marks: 1, max_words: 12 });
        let cfg = s.codec_config(&[7u8; 32], Some(&[1u8; 12])).unwrap();
        assert_eq!(cfg.mode(), CipherMode::GcmSiv);
        assert_eq!(cfg.compression(), CompressionMethod::Brotli);
        assert_eq!(cfg.key_length(), 256);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let s = Settings::from_toml_str("[encryption]\nkey_length = 192\n").unwrap();
        assert_eq!(s.encryption.cipher_mode, "OFB");
        assert_eq!(s.encryption.key_length, 192);
    }

    #[test]
    fn unknown_mode_rejected() {
        let err = Settings::from_toml_str("[encryption]\ncipher_mode = \"ROT13\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(StegoError::UnsupportedMethod { .. })));
    }

    #[test]
    fn bad_chunk_width_rejected() {
        let err = Settings::from_toml_str("[generation]\nchunk_width = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(StegoError::InvalidChunkWidth(0))));
    }

    #[test]
    fn malformed_toml() {
        assert!(matches!(Settings::from_toml_str("[encryption"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn key_comes_from_caller() {
        let s = Settings::default();
        assert!(matches!(
            s.codec_config(&[0u8; 32], Some(&[0u8; 16])),
            Err(StegoError::KeyLengthMismatch { expected: 128, actual: 256, .. })
        ));
        assert!(s.codec_config(&[0u8; 16], Some(&[0u8; 16])).is_ok());
    }
}
