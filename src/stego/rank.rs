// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Candidate ranking and bit-driven token selection.
//!
//! At each generation step the model's next-token scores are reduced to the
//! `2^w` highest-scoring token ids (`w` = chunk width), ordered by descending
//! score. Ties keep the model's native index order so the ranking is fully
//! deterministic. A `w`-bit chunk with value `i` then selects `candidates[i]`.

use core::cmp::Ordering;

use crate::stego::bits::{validate_chunk_width, BitChunk};
use crate::stego::error::StegoError;
use crate::stego::model::TokenId;

/// Ranked next-token options, best first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet(Vec<TokenId>);

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[TokenId] {
        &self.0
    }
}

/// Descending score, then ascending index. NaN sorts after every number
/// and `-0.0` ties with `0.0`.
fn rank_order(scores: &[f32], a: usize, b: usize) -> Ordering {
    let key = |i: usize| {
        let s = scores[i];
        if s.is_nan() { f32::NEG_INFINITY } else { s + 0.0 }
    };
    let (sa, sb) = (key(a), key(b));
    match sb.total_cmp(&sa) {
        Ordering::Equal => {
            // NaN and -inf share a key; put the real -inf first.
            scores[a].is_nan().cmp(&scores[b].is_nan()).then(a.cmp(&b))
        }
        other => other,
    }
}

/// Pick the `2^chunk_width` best-scoring token ids.
///
/// # Errors
/// - [`StegoError::InvalidChunkWidth`] if `chunk_width` is out of range.
/// - [`StegoError::InsufficientVocabulary`] if `scores` has fewer entries
///   than the candidate set needs. The set is never silently truncated.
pub fn rank(scores: &[f32], chunk_width: u32) -> Result<CandidateSet, StegoError> {
    validate_chunk_width(chunk_width)?;
    let k = 1usize << chunk_width;
    if scores.len() < k {
        return Err(StegoError::InsufficientVocabulary { required: k, available: scores.len() });
    }

    let mut indices: Vec<usize> = (0..scores.len()).collect();
    // Partition the top k to the front, then order just those.
    if k < indices.len() {
        indices.select_nth_unstable_by(k - 1, |&a, &b| rank_order(scores, a, b));
        indices.truncate(k);
    }
    indices.sort_unstable_by(|&a, &b| rank_order(scores, a, b));

    Ok(CandidateSet(indices.into_iter().map(|i| i as TokenId).collect()))
}

/// Choose the candidate addressed by `chunk`.
///
/// With `2^width == candidates.len()` the index is always in range; the
/// modulo keeps the function total for mismatched inputs.
pub fn select(candidates: &CandidateSet, chunk: &BitChunk) -> TokenId {
    let idx = chunk.value() as usize % candidates.len().max(1);
    candidates.0.get(idx).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(bits: &[u8]) -> BitChunk {
        BitChunk::from_bits(bits).unwrap()
    }

    #[test]
    fn ranks_by_descending_score() {
        let scores = [0.1, 0.9, 0.5, 0.7, 0.3];
        let set = rank(&scores, 2).unwrap();
        assert_eq!(set.as_slice(), &[1, 3, 2, 4]);
    }

    #[test]
    fn ties_keep_index_order() {
        let scores = [1.0f32; 40];
        let set = rank(&scores, 4).unwrap();
        let expected: Vec<TokenId> = (0..16).collect();
        assert_eq!(set.as_slice(), &expected[..]);

        let mut signed = [-1.0f32; 8];
        signed[0] = -0.0;
        signed[1] = 0.0;
        assert_eq!(rank(&signed, 1).unwrap().as_slice(), &[0, 1]);
        signed.swap(0, 1);
        assert_eq!(rank(&signed, 1).unwrap().as_slice(), &[0, 1]);
    }

    #[test]
    fn exact_size_for_every_width() {
        let scores: Vec<f32> = (0..300).map(|i| ((i * 37) % 101) as f32).collect();
        for width in 1..=8 {
            let set = rank(&scores, width).unwrap();
            assert_eq!(set.len(), 1 << width);
        }
    }

    #[test]
    fn top_k_matches_full_sort() {
        let scores: Vec<f32> = (0..500).map(|i| ((i * 7919) % 257) as f32 * 0.5).collect();
        let mut full: Vec<usize> = (0..scores.len()).collect();
        full.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap());
        let expected: Vec<TokenId> = full[..16].iter().map(|&i| i as TokenId).collect();
        assert_eq!(rank(&scores, 4).unwrap().as_slice(), &expected[..]);
    }

    #[test]
    fn nan_ranks_last() {
        let scores = [f32::NAN, 0.0, f32::NEG_INFINITY, 2.0];
        let set = rank(&scores, 2).unwrap();
        assert_eq!(set.as_slice(), &[3, 1, 2, 0]);
    }

    #[test]
    fn insufficient_vocabulary() {
        let scores = [0.0f32; 15];
        assert_eq!(
            rank(&scores, 4),
            Err(StegoError::InsufficientVocabulary { required: 16, available: 15 })
        );
    }

    #[test]
    fn select_uses_big_endian_value() {
        let scores: Vec<f32> = (0..16).map(|i| -(i as f32)).collect();
        let set = rank(&scores, 4).unwrap();
        // 1011 = 11
        assert_eq!(select(&set, &chunk(&[1, 0, 1, 1])), 11);
        assert_eq!(select(&set, &chunk(&[0, 0, 0, 0])), 0);
        assert_eq!(select(&set, &chunk(&[1, 1, 1, 1])), 15);
    }

    #[test]
    fn select_wraps_oversized_chunk() {
        let set = rank(&[3.0, 2.0, 1.0, 0.0], 2).unwrap();
        // 3-bit chunk value 6 against a 4-entry set → index 2
        assert_eq!(select(&set, &chunk(&[1, 1, 0])), 2);
    }
}
