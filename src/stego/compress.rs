// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Plaintext compression into bitstreams.
//!
//! Two methods are supported, selected by tag:
//!
//! - `utf8`: the UTF-8 bytes of the text, MSB first. `default` is an alias.
//! - `brotli`: Brotli-compressed UTF-8 bytes. Worth it for longer messages
//!   only; short chat messages usually grow under Brotli framing.
//!
//! Both are exact inverses of their decompressors.

use core::fmt;
use core::str::FromStr;
use std::io::{Read, Write};

use crate::stego::bits::Bitstream;
use crate::stego::error::{MethodKind, StegoError};

/// Brotli compression quality (0-11). Messages are small, so max quality
/// compresses in well under a millisecond.
const BROTLI_QUALITY: u32 = 11;

/// Brotli LG_WINDOW_SIZE. 22 is the default (4 MB window).
const BROTLI_LG_WINDOW_SIZE: u32 = 22;

/// Upper bound on decompressed size, to stop decompression bombs.
const MAX_DECOMPRESSED_BYTES: u64 = 128 * 1024;

/// Compression method tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompressionMethod {
    #[default]
    Utf8,
    Brotli,
}

impl CompressionMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf8",
            Self::Brotli => "brotli",
        }
    }

    /// Compress `text` into a bitstream.
    pub fn compress(&self, text: &str) -> Bitstream {
        match self {
            Self::Utf8 => Bitstream::from_bytes(text.as_bytes()),
            Self::Brotli => Bitstream::from_bytes(&compress_brotli(text.as_bytes())),
        }
    }

    /// Recover the text from a bitstream produced by [`compress`](Self::compress).
    ///
    /// # Errors
    /// [`StegoError::DecompressionFailure`] if the stream is not byte-aligned,
    /// is not a valid Brotli stream, or does not decode to UTF-8.
    pub fn decompress(&self, bits: &Bitstream) -> Result<String, StegoError> {
        let failure = || StegoError::DecompressionFailure { method: self.name(), bits: bits.len() };
        let bytes = bits.to_bytes().ok_or_else(failure)?;
        let raw = match self {
            Self::Utf8 => bytes,
            Self::Brotli => decompress_brotli(&bytes).ok_or_else(failure)?,
        };
        String::from_utf8(raw).map_err(|_| failure())
    }
}

impl FromStr for CompressionMethod {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" | "default" => Ok(Self::Utf8),
            "brotli" => Ok(Self::Brotli),
            _ => Err(StegoError::UnsupportedMethod {
                kind: MethodKind::Compression,
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn compress_brotli(data: &[u8]) -> Vec<u8> {
    let mut output = Vec::new();
    {
        let mut compressor = brotli::CompressorWriter::new(
            &mut output,
            4096, // buffer size
            BROTLI_QUALITY,
            BROTLI_LG_WINDOW_SIZE,
        );
        compressor.write_all(data).expect("writing to a Vec cannot fail");
        // CompressorWriter flushes on drop
    }
    output
}

fn decompress_brotli(data: &[u8]) -> Option<Vec<u8>> {
    let mut output = Vec::new();
    let decompressor = brotli::Decompressor::new(data, 4096);
    decompressor
        .take(MAX_DECOMPRESSED_BYTES)
        .read_to_end(&mut output)
        .ok()?;
    Some(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_is_plain_bytes() {
        let bits = CompressionMethod::Utf8.compress("A");
        assert_eq!(bits.to_string(), "01000001");
    }

    #[test]
    fn utf8_roundtrip_unicode() {
        let text = "Ünïcödé 🎉";
        let bits = CompressionMethod::Utf8.compress(text);
        assert_eq!(CompressionMethod::Utf8.decompress(&bits).unwrap(), text);
    }

    #[test]
    fn utf8_rejects_misaligned() {
        let bits: Bitstream = "0100000".parse().unwrap();
        assert!(matches!(
            CompressionMethod::Utf8.decompress(&bits),
            Err(StegoError::DecompressionFailure { method: "utf8", bits: 7 })
        ));
    }

    #[test]
    fn utf8_rejects_invalid_sequence() {
        let bits = Bitstream::from_bytes(&[0xFF, 0xFE]);
        assert!(CompressionMethod::Utf8.decompress(&bits).is_err());
    }

    #[test]
    fn brotli_shrinks_repetitive_text() {
        let text = "see you at the station. ".repeat(40);
        let bits = CompressionMethod::Brotli.compress(&text);
        assert!(bits.len() < text.len() * 8);
        assert_eq!(CompressionMethod::Brotli.decompress(&bits).unwrap(), text);
    }

    #[test]
    fn brotli_empty_text() {
        let bits = CompressionMethod::Brotli.compress("");
        assert_eq!(CompressionMethod::Brotli.decompress(&bits).unwrap(), "");
    }

    #[test]
    fn tag_parsing() {
        assert_eq!("utf8".parse::<CompressionMethod>().unwrap(), CompressionMethod::Utf8);
        assert_eq!("default".parse::<CompressionMethod>().unwrap(), CompressionMethod::Utf8);
        assert_eq!("Brotli".parse::<CompressionMethod>().unwrap(), CompressionMethod::Brotli);
        assert!(matches!(
            "huffman".parse::<CompressionMethod>(),
            Err(StegoError::UnsupportedMethod { kind: MethodKind::Compression, .. })
        ));
    }
}
