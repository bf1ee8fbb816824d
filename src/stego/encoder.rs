// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Cover-text generation driven by bit chunks.
//!
//! The encoder seeds a generation context with a style prompt, then for each
//! `w`-bit chunk of the payload:
//!
//! 1. runs the model forward over the context to score the next token,
//! 2. ranks the scores into `2^w` candidates,
//! 3. picks the candidate whose rank equals the chunk value,
//! 4. keeps only the printable ASCII part of the token's text,
//! 5. appends the token to the context and the text to the cover text,
//! 6. stops once the text holds two sentence-ending marks or more than
//!    twenty words, even if chunks remain.
//!
//! The number of bits embedded is `chunks_consumed * w`, which can be less
//! than the payload. Callers that need the whole payload carried re-invoke
//! [`CoverTextEncoder::embed`] on [`Bitstream::remaining`] and send several
//! cover texts.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::stego::bits::{validate_chunk_width, Bitstream};
use crate::stego::error::StegoError;
use crate::stego::model::{LanguageModel, TokenId};
use crate::stego::progress::Progress;
use crate::stego::prompt::SeedPrompt;
use crate::stego::rank;

/// When to end a cover text before the payload is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopPolicy {
    /// Stop once the text contains at least this many of `.`, `!`, `?`.
    pub max_terminal_marks: usize,
    /// Stop once the text has more than this many whitespace-separated words.
    pub max_words: usize,
}

impl Default for StopPolicy {
    fn default() -> Self {
        Self { max_terminal_marks: 2, max_words: 20 }
    }
}

impl StopPolicy {
    pub fn should_stop(&self, text: &str) -> bool {
        let text = text.trim();
        let marks = text.chars().filter(|c| matches!(c, '.' | '!' | '?')).count();
        marks >= self.max_terminal_marks || text.split_whitespace().count() > self.max_words
    }
}

/// Keep only printable single-byte characters (`' '..='~'`).
///
/// Anything else (non-ASCII, newlines, control codes) is dropped, not
/// replaced, so a token can contribute no visible text at all.
pub fn printable_ascii(s: &str) -> String {
    s.chars().filter(|c| matches!(c, ' '..='~')).collect()
}

/// Running state of one cover-text synthesis. Append-only.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    input_ids: Vec<TokenId>,
    prompt_len: usize,
    text: String,
    chunks_consumed: usize,
}

impl GenerationContext {
    fn seed(prompt_ids: Vec<TokenId>) -> Self {
        let prompt_len = prompt_ids.len();
        Self { input_ids: prompt_ids, prompt_len, text: String::new(), chunks_consumed: 0 }
    }

    /// Prompt plus generated tokens, the model's input for the next step.
    pub fn context(&self) -> &[TokenId] {
        &self.input_ids
    }

    pub fn generated(&self) -> &[TokenId] {
        &self.input_ids[self.prompt_len..]
    }

    /// Accumulated (filtered, untrimmed) cover text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn chunks_consumed(&self) -> usize {
        self.chunks_consumed
    }

    fn push(&mut self, token: TokenId, piece: &str) {
        self.input_ids.push(token);
        self.text.push_str(piece);
        self.chunks_consumed += 1;
    }
}

/// Output of one embedding pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingResult {
    /// Generated text, trimmed of surrounding whitespace.
    pub cover_text: String,
    /// `chunks_consumed * chunk_width`; may include right-padding bits.
    pub bits_embedded: usize,
    pub chunks_consumed: usize,
    pub chunk_width: u32,
    /// Token ids chosen at each step, one per consumed chunk.
    pub tokens: Vec<TokenId>,
}

impl EncodingResult {
    /// Whether all `input_bits` of the payload are carried by this cover text.
    pub fn is_complete(&self, input_bits: usize) -> bool {
        self.bits_embedded >= input_bits
    }
}

/// Generates cover text whose token choices encode a bitstream.
pub struct CoverTextEncoder<'a, M: LanguageModel + ?Sized> {
    model: &'a M,
    stop: StopPolicy,
    progress: Option<&'a Progress>,
}

impl<'a, M: LanguageModel + ?Sized> CoverTextEncoder<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self { model, stop: StopPolicy::default(), progress: None }
    }

    pub fn with_stop_policy(mut self, stop: StopPolicy) -> Self {
        self.stop = stop;
        self
    }

    /// Report per-chunk progress to `progress` and honour its cancel flag.
    pub fn with_progress(mut self, progress: &'a Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn model(&self) -> &M {
        self.model
    }

    pub fn stop_policy(&self) -> StopPolicy {
        self.stop
    }

    /// Embed `bits` into a freshly generated cover text.
    ///
    /// The stream is zero-padded on the right to a multiple of
    /// `chunk_width`. Generation ends when the stopping policy fires or all
    /// chunks are consumed, whichever comes first.
    ///
    /// # Errors
    /// - [`StegoError::EmptyBitstream`] if `bits` is empty.
    /// - [`StegoError::InvalidChunkWidth`] if `chunk_width` is out of range.
    /// - [`StegoError::EmptyPrompt`] if the prompt yields no tokens.
    /// - [`StegoError::InsufficientVocabulary`] if the model vocabulary is
    ///   smaller than `2^chunk_width`.
    /// - [`StegoError::ModelUnavailable`] if any model call fails or the
    ///   embedding is cancelled.
    pub fn embed(&self, bits: &Bitstream, chunk_width: u32, prompt: &SeedPrompt) -> Result<EncodingResult, StegoError> {
        let result = self.embed_with(bits, chunk_width, prompt, self.progress);
        if let Some(progress) = self.progress {
            progress.finish();
        }
        result
    }

    fn embed_with(
        &self,
        bits: &Bitstream,
        chunk_width: u32,
        prompt: &SeedPrompt,
        progress: Option<&Progress>,
    ) -> Result<EncodingResult, StegoError> {
        if bits.is_empty() {
            return Err(StegoError::EmptyBitstream);
        }
        validate_chunk_width(chunk_width)?;
        let candidates = 1usize << chunk_width;
        let vocab = self.model.vocab_size();
        if vocab < candidates {
            return Err(StegoError::InsufficientVocabulary { required: candidates, available: vocab });
        }

        // Seeding
        if prompt.as_str().trim().is_empty() {
            return Err(StegoError::EmptyPrompt);
        }
        let prompt_ids = self.model.tokenize(prompt.as_str())?;
        if prompt_ids.is_empty() {
            return Err(StegoError::EmptyPrompt);
        }
        let mut ctx = GenerationContext::seed(prompt_ids);

        let chunks = bits.chunks(chunk_width)?;
        if let Some(p) = progress {
            p.init(chunks.len().min(u32::MAX as usize) as u32);
        }
        debug!(bits = bits.len(), chunks = chunks.len(), chunk_width, "embedding bitstream");

        // Embedding
        for chunk in &chunks {
            if let Some(p) = progress {
                p.check_cancelled()?;
            }
            let scores = self.model.next_token_scores(ctx.context())?;
            let ranked = rank::rank(&scores, chunk_width)?;
            let token = rank::select(&ranked, chunk);
            let piece = printable_ascii(&self.model.detokenize(token)?);

            ctx.push(token, &piece);
            if let Some(p) = progress {
                p.advance();
            }
            trace!(step = ctx.chunks_consumed(), value = chunk.value(), token, "chunk consumed");

            if self.stop.should_stop(ctx.text()) {
                debug!(
                    consumed = ctx.chunks_consumed(),
                    remaining = chunks.len() - ctx.chunks_consumed(),
                    "stopping policy reached"
                );
                break;
            }
        }

        // Done
        let chunks_consumed = ctx.chunks_consumed();
        Ok(EncodingResult {
            cover_text: ctx.text().trim().to_string(),
            bits_embedded: chunks_consumed * chunk_width as usize,
            chunks_consumed,
            chunk_width,
            tokens: ctx.generated().to_vec(),
        })
    }
}

#[cfg(not(feature = "parallel"))]
impl<'a, M: LanguageModel + ?Sized> CoverTextEncoder<'a, M> {
    /// Embed several independent bitstreams, each with its own prompt.
    ///
    /// Progress is not reported for batches. Results are in input order.
    pub fn embed_batch(&self, jobs: &[(Bitstream, SeedPrompt)], chunk_width: u32) -> Vec<Result<EncodingResult, StegoError>> {
        jobs.iter()
            .map(|(bits, prompt)| self.embed_with(bits, chunk_width, prompt, None))
            .collect()
    }
}

#[cfg(feature = "parallel")]
impl<'a, M: LanguageModel + Sync + ?Sized> CoverTextEncoder<'a, M> {
    /// Embed several independent bitstreams in parallel, each with its own
    /// prompt. No generation context is shared between jobs.
    ///
    /// Progress is not reported for batches. Results are in input order.
    pub fn embed_batch(&self, jobs: &[(Bitstream, SeedPrompt)], chunk_width: u32) -> Vec<Result<EncodingResult, StegoError>> {
        use rayon::prelude::*;

        jobs.par_iter()
            .map(|(bits, prompt)| self.embed_with(bits, chunk_width, prompt, None))
            .collect()
    }
}
