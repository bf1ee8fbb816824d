// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! End-to-end message pipeline.
//!
//! Outbound: plaintext → [`codec::encode`] → bitstream →
//! [`CoverTextEncoder::embed`] → cover text plus bits embedded.
//!
//! Inbound: a bitstream the caller already holds (e.g. kept alongside the
//! sent message) → [`codec::decode`] → plaintext. Recovering bits from the
//! cover text itself is not supported.

use tracing::debug;

use crate::stego::bits::Bitstream;
use crate::stego::codec::{self, CodecConfig};
use crate::stego::encoder::{CoverTextEncoder, EncodingResult};
use crate::stego::error::StegoError;
use crate::stego::model::LanguageModel;
use crate::stego::prompt::SeedPrompt;

/// Couples the bit-level codec with a cover-text encoder.
pub struct CodecPipeline<'a, M: LanguageModel + ?Sized> {
    encoder: CoverTextEncoder<'a, M>,
}

impl<'a, M: LanguageModel + ?Sized> CodecPipeline<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self { encoder: CoverTextEncoder::new(model) }
    }

    pub fn with_encoder(encoder: CoverTextEncoder<'a, M>) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> &CoverTextEncoder<'a, M> {
        &self.encoder
    }

    /// Encode `plaintext` and embed the resulting bitstream in a cover text.
    ///
    /// Errors from either stage are returned unchanged. Check
    /// [`EncodingResult::bits_embedded`]: a long message may not fit in one
    /// cover text.
    pub fn to_cover_text(
        &self,
        plaintext: &str,
        config: &CodecConfig,
        chunk_width: u32,
        prompt: &SeedPrompt,
    ) -> Result<EncodingResult, StegoError> {
        let bits = codec::encode(plaintext, config)?;
        let result = self.encoder.embed(&bits, chunk_width, prompt)?;
        debug!(
            input_bits = bits.len(),
            embedded = result.bits_embedded,
            complete = result.is_complete(bits.len()),
            "cover text generated"
        );
        Ok(result)
    }

    /// Like [`to_cover_text`](Self::to_cover_text), also returning the full
    /// bitstream so the caller can store it or embed the remainder later.
    pub fn to_cover_text_with_bits(
        &self,
        plaintext: &str,
        config: &CodecConfig,
        chunk_width: u32,
        prompt: &SeedPrompt,
    ) -> Result<(Bitstream, EncodingResult), StegoError> {
        let bits = codec::encode(plaintext, config)?;
        let result = self.encoder.embed(&bits, chunk_width, prompt)?;
        Ok((bits, result))
    }

    /// Recover plaintext from a caller-held bitstream.
    pub fn from_bits(&self, bits: &Bitstream, config: &CodecConfig) -> Result<String, StegoError> {
        codec::decode(bits, config)
    }
}
