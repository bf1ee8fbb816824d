// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Steganographic message codec.
//!
//! Two layers:
//!
//! - **Bit level** (`codec`): plaintext is compressed (`utf8` or `brotli`)
//!   and encrypted (AES in ECB, CBC, OFB, or GCM-SIV mode) into a
//!   [`Bitstream`]. Pure data transform, no model involved.
//!
//! - **Cover text** (`encoder`): the bitstream is cut into `w`-bit chunks and
//!   each chunk picks one of the `2^w` most likely next tokens of a language
//!   model, producing innocuous chat text.
//!
//! [`CodecPipeline`] runs both. Plaintext recovery goes through
//! [`codec::decode`] on a bitstream the receiver already holds.

pub mod error;
pub mod bits;
pub mod compress;
pub mod crypto;
pub mod codec;
pub mod model;
pub mod rank;
pub mod prompt;
pub mod progress;
pub mod encoder;
mod pipeline;

pub use bits::{BitChunk, Bitstream, DEFAULT_CHUNK_WIDTH, MAX_CHUNK_WIDTH};
pub use codec::{decode, encode, CodecConfig};
pub use compress::CompressionMethod;
pub use crypto::CipherMode;
pub use encoder::{CoverTextEncoder, EncodingResult, GenerationContext, StopPolicy};
pub use error::StegoError;
pub use model::{LanguageModel, ModelError, TokenId};
pub use pipeline::CodecPipeline;
pub use progress::Progress;
pub use prompt::{SeedPrompt, STYLE_PROMPTS};
pub use rank::{rank, select, CandidateSet};
