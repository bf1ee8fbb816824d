//! Deterministic stand-ins for a real language model.

#![allow(dead_code)]

use windtexter_core::{LanguageModel, ModelError, TokenId};

/// Ranks token `i` at position `i` regardless of context, so a chunk with
/// value `v` always selects token `v`.
pub struct RankedModel {
    pub pieces: Vec<String>,
}

impl RankedModel {
    /// 16 tokens: `" w0"`…`" w15"`, with the given positions overridden.
    pub fn with_overrides(overrides: &[(usize, &str)]) -> Self {
        let mut pieces: Vec<String> = (0..16).map(|i| format!(" w{i}")).collect();
        for &(i, piece) in overrides {
            pieces[i] = piece.to_string();
        }
        Self { pieces }
    }
}

impl LanguageModel for RankedModel {
    fn vocab_size(&self) -> usize {
        self.pieces.len()
    }

    fn tokenize(&self, text: &str) -> Result<Vec<TokenId>, ModelError> {
        Ok(text.split_whitespace().map(|w| (w.len() % self.pieces.len()) as TokenId).collect())
    }

    fn detokenize(&self, token: TokenId) -> Result<String, ModelError> {
        self.pieces
            .get(token as usize)
            .cloned()
            .ok_or_else(|| ModelError::new(format!("token {token} out of range")))
    }

    fn next_token_scores(&self, _context: &[TokenId]) -> Result<Vec<f32>, ModelError> {
        Ok((0..self.pieces.len()).map(|i| -(i as f32)).collect())
    }
}

/// A small chat vocabulary whose scores depend on the whole context, so the
/// ranking changes from step to step like a real model's would.
pub struct ToyModel {
    pieces: Vec<&'static str>,
}

const TOY_VOCAB: [&str; 48] = [
    " hey", " so", " I", " you", " we", " it", " was", " is", " just", " gonna",
    " maybe", " later", " tonight", " lol", " yeah", " ok", " the", " a", " that", " thing",
    " call", " text", " me", " back", " soon", " really", " good", " fine", " sure", " cool",
    " then", " now", " still", " out", " up", " home", " there", " here", " too", " what",
    ".", "!", "?", ",", " \u{1F600}", "\n", " caf\u{e9}", " and",
];

impl ToyModel {
    pub fn new() -> Self {
        Self { pieces: TOY_VOCAB.to_vec() }
    }
}

impl LanguageModel for ToyModel {
    fn vocab_size(&self) -> usize {
        self.pieces.len()
    }

    fn tokenize(&self, text: &str) -> Result<Vec<TokenId>, ModelError> {
        let n = self.pieces.len() as u32;
        Ok(text
            .split_whitespace()
            .map(|w| w.bytes().fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32)) % n)
            .collect())
    }

    fn detokenize(&self, token: TokenId) -> Result<String, ModelError> {
        self.pieces
            .get(token as usize)
            .map(|s| s.to_string())
            .ok_or_else(|| ModelError::new(format!("token {token} out of range")))
    }

    fn next_token_scores(&self, context: &[TokenId]) -> Result<Vec<f32>, ModelError> {
        let h = context
            .iter()
            .fold(17u64, |acc, &t| acc.wrapping_mul(1_000_003).wrapping_add(t as u64 + 1));
        Ok((0..self.pieces.len() as u64)
            .map(|i| ((i.wrapping_mul(2_654_435_761) ^ h) % 1009) as f32 / 10.0)
            .collect())
    }
}

/// Fails every forward pass, as an unloaded or crashed backend would.
pub struct OfflineModel;

impl LanguageModel for OfflineModel {
    fn vocab_size(&self) -> usize {
        50_257
    }

    fn tokenize(&self, text: &str) -> Result<Vec<TokenId>, ModelError> {
        Ok(text.split_whitespace().map(|_| 0).collect())
    }

    fn detokenize(&self, _token: TokenId) -> Result<String, ModelError> {
        Ok(String::new())
    }

    fn next_token_scores(&self, _context: &[TokenId]) -> Result<Vec<f32>, ModelError> {
        Err(ModelError::new("inference backend not loaded"))
    }
}
