// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # windtexter-core
//!
//! Linguistic steganography for short chat messages. A message is
//! compressed, encrypted with a caller-supplied AES key, and turned into a
//! bitstream; the bitstream then steers a language model token by token, so
//! the message travels inside an ordinary-looking text.
//!
//! - [`stego::codec`]: plaintext ⇄ bitstream (compression + cipher).
//! - [`stego::rank`]: top-`2^w` candidate ranking and chunk-driven selection.
//! - [`stego::encoder`]: incremental cover-text generation with a stopping
//!   policy; may embed only a prefix of the bitstream.
//! - [`config`]: TOML settings for mode tags and generation limits.
//!
//! Inference is not part of this crate. Hosts implement
//! [`LanguageModel`] for their backend and pass the handle in explicitly.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use windtexter_core::{CodecConfig, CodecPipeline, CompressionMethod, CipherMode, SeedPrompt};
//!
//! let config = CodecConfig::new(CompressionMethod::Utf8, CipherMode::Ofb, &key, 128, Some(&iv))?;
//! let pipeline = CodecPipeline::new(&model);
//! let out = pipeline.to_cover_text("meet at 6", &config, 4, &SeedPrompt::random(&mut rand::thread_rng()))?;
//! println!("{} ({} bits)", out.cover_text, out.bits_embedded);
//! ```

pub mod config;
pub mod stego;

pub use config::{ConfigError, Settings};
pub use stego::{decode, encode, Bitstream, BitChunk, CandidateSet, CipherMode, CodecConfig, CodecPipeline};
pub use stego::{CompressionMethod, CoverTextEncoder, EncodingResult, LanguageModel, ModelError, TokenId};
pub use stego::{Progress, SeedPrompt, StegoError, StopPolicy, DEFAULT_CHUNK_WIDTH, STYLE_PROMPTS};
