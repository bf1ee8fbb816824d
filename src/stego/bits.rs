// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Bitstreams and fixed-width bit chunks.
//!
//! Bits are stored one per `u8` (values 0 or 1), MSB first when derived
//! from bytes. The cover-text encoder consumes a [`Bitstream`] as a sequence
//! of [`BitChunk`]s; a stream whose length is not a multiple of the chunk
//! width is zero-padded on the right:
//!
//! ```text
//! bits   1 0 1 1 0 1            (6 bits, width 4)
//! chunks [1 0 1 1] [0 1 0 0]    (values 11 and 4)
//! ```

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::stego::error::StegoError;

/// Default number of bits consumed per generated token.
pub const DEFAULT_CHUNK_WIDTH: u32 = 4;

/// Largest supported chunk width. `2^16` candidates already exceeds the
/// vocabulary of most language models.
pub const MAX_CHUNK_WIDTH: u32 = 16;

/// Reject chunk widths outside `1..=MAX_CHUNK_WIDTH`.
pub fn validate_chunk_width(width: u32) -> Result<(), StegoError> {
    if width == 0 || width > MAX_CHUNK_WIDTH {
        return Err(StegoError::InvalidChunkWidth(width));
    }
    Ok(())
}

/// An ordered sequence of bits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Bitstream(Vec<u8>);

impl Bitstream {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a bitstream from explicit bit values.
    ///
    /// # Errors
    /// [`StegoError::InvalidBit`] if any value is not 0 or 1.
    pub fn from_bits(bits: Vec<u8>) -> Result<Self, StegoError> {
        if let Some(position) = bits.iter().position(|&b| b > 1) {
            return Err(StegoError::InvalidBit { position });
        }
        Ok(Self(bits))
    }

    /// Expand bytes into bits, MSB first.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut bits = Vec::with_capacity(bytes.len() * 8);
        for &byte in bytes {
            for bit_pos in (0..8).rev() {
                bits.push((byte >> bit_pos) & 1);
            }
        }
        Self(bits)
    }

    /// Pack the bits back into bytes (MSB first).
    ///
    /// Returns `None` if the length is not a multiple of 8.
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        if self.0.len() % 8 != 0 {
            return None;
        }
        let bytes = self
            .0
            .chunks(8)
            .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit))
            .collect();
        Some(bytes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Number of chunks of `width` bits needed to cover the stream
    /// (`ceil(len / width)`).
    pub fn chunk_count(&self, width: u32) -> usize {
        let w = width.max(1) as usize;
        (self.0.len() + w - 1) / w
    }

    /// Split into chunks of `width` bits, zero-padding the last one on the right.
    ///
    /// # Errors
    /// [`StegoError::InvalidChunkWidth`] if `width` is outside `1..=MAX_CHUNK_WIDTH`.
    pub fn chunks(&self, width: u32) -> Result<Vec<BitChunk>, StegoError> {
        validate_chunk_width(width)?;
        let chunks = self
            .0
            .chunks(width as usize)
            .map(|bits| {
                let value = bits.iter().fold(0u32, |acc, &bit| (acc << 1) | bit as u32);
                // Right-pad a short tail with zeros.
                let pad = width - bits.len() as u32;
                BitChunk { value: value << pad, width }
            })
            .collect();
        Ok(chunks)
    }

    /// The bits not covered by an embedding that consumed `embedded` bits.
    ///
    /// Padding bits count towards `embedded`, so a value past the end
    /// yields an empty stream.
    pub fn remaining(&self, embedded: usize) -> Bitstream {
        Self(self.0.get(embedded..).unwrap_or_default().to_vec())
    }
}

impl TryFrom<Vec<u8>> for Bitstream {
    type Error = StegoError;

    fn try_from(bits: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_bits(bits)
    }
}

impl From<Bitstream> for Vec<u8> {
    fn from(bits: Bitstream) -> Self {
        bits.0
    }
}

impl FromStr for Bitstream {
    type Err = StegoError;

    /// Parse a string of `'0'`/`'1'` characters. Whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = Vec::with_capacity(s.len());
        for (position, c) in s.chars().filter(|c| !c.is_whitespace()).enumerate() {
            match c {
                '0' => bits.push(0),
                '1' => bits.push(1),
                _ => return Err(StegoError::InvalidBit { position }),
            }
        }
        Ok(Self(bits))
    }
}

impl fmt::Display for Bitstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit == 1 { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// A fixed-width group of bits, interpreted as an unsigned big-endian integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitChunk {
    value: u32,
    width: u32,
}

impl BitChunk {
    /// Build a chunk from exactly `width` bits.
    ///
    /// # Errors
    /// [`StegoError::InvalidChunkWidth`] if `bits.len()` is not a valid width,
    /// [`StegoError::InvalidBit`] for values other than 0 or 1.
    pub fn from_bits(bits: &[u8]) -> Result<Self, StegoError> {
        let width = bits.len() as u32;
        validate_chunk_width(width)?;
        let mut value = 0u32;
        for (position, &bit) in bits.iter().enumerate() {
            if bit > 1 {
                return Err(StegoError::InvalidBit { position });
            }
            value = (value << 1) | bit as u32;
        }
        Ok(Self { value, width })
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// The chunk's bits, MSB first.
    pub fn bits(&self) -> Vec<u8> {
        (0..self.width).rev().map(|i| ((self.value >> i) & 1) as u8).collect()
    }
}
