// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Language model boundary.
//!
//! The encoder only needs three things from a model: turn a prompt into
//! token ids, turn a single token id back into text, and score every
//! vocabulary entry for the next position. Inference backends implement
//! [`LanguageModel`]; the handle is loaded once by the host and passed by
//! reference into every call, so tests can substitute a stub scorer.
//!
//! Implementations must be deterministic: identical weights and identical
//! input ids give identical scores. Selection is driven entirely by the
//! embedded bits, so no sampling happens on this side of the boundary.

use core::fmt;

/// Index into the model's vocabulary.
pub type TokenId = u32;

/// Failure reported by a model backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelError(pub String);

impl ModelError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ModelError {}

/// A causal language model plus its tokenizer.
pub trait LanguageModel {
    /// Number of entries in the vocabulary.
    fn vocab_size(&self) -> usize;

    /// Encode text into token ids.
    fn tokenize(&self, text: &str) -> Result<Vec<TokenId>, ModelError>;

    /// Decode one token id into text, skipping special tokens.
    fn detokenize(&self, token: TokenId) -> Result<String, ModelError>;

    /// Score every vocabulary entry as the continuation of `context`.
    ///
    /// The returned vector has one entry per vocabulary token (logits or
    /// any monotone transform of them).
    fn next_token_scores(&self, context: &[TokenId]) -> Result<Vec<f32>, ModelError>;
}

impl<M: LanguageModel + ?Sized> LanguageModel for &M {
    fn vocab_size(&self) -> usize {
        (**self).vocab_size()
    }

    fn tokenize(&self, text: &str) -> Result<Vec<TokenId>, ModelError> {
        (**self).tokenize(text)
    }

    fn detokenize(&self, token: TokenId) -> Result<String, ModelError> {
        (**self).detokenize(token)
    }

    fn next_token_scores(&self, context: &[TokenId]) -> Result<Vec<f32>, ModelError> {
        (**self).next_token_scores(context)
    }
}

impl<M: LanguageModel + ?Sized> LanguageModel for std::sync::Arc<M> {
    fn vocab_size(&self) -> usize {
        (**self).vocab_size()
    }

    fn tokenize(&self, text: &str) -> Result<Vec<TokenId>, ModelError> {
        (**self).tokenize(text)
    }

    fn detokenize(&self, token: TokenId) -> Result<String, ModelError> {
        (**self).detokenize(token)
    }

    fn next_token_scores(&self, context: &[TokenId]) -> Result<Vec<f32>, ModelError> {
        (**self).next_token_scores(context)
    }
}
