// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Seed prompts for cover-text generation.
//!
//! The prompt only sets the style of the generated text; it carries no
//! payload bits. Callers pick it explicitly, either by index into
//! [`STYLE_PROMPTS`], as a custom string, or drawn from an RNG they own, so
//! a test harness can pin it and keep generation deterministic.

use std::borrow::Cow;

use rand::Rng;

/// Built-in style prompts for short, casual chat messages.
pub const STYLE_PROMPTS: [&str; 5] = [
    "Say something casual like you're texting a friend. Keep it under 2 sentences.",
    "Write a short, vague message someone might send in chat. Keep it brief.",
    "Text something natural and ambiguous in under 20 words.",
    "Casual chat message. Two sentences max. Sounds normal.",
    "Make it sound like a quick message to a friend. Nothing specific.",
];

/// The text that seeds the generation context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPrompt(Cow<'static, str>);

impl SeedPrompt {
    /// One of the built-in [`STYLE_PROMPTS`], or `None` if `index` is out of range.
    pub fn style(index: usize) -> Option<Self> {
        STYLE_PROMPTS.get(index).map(|&p| Self(Cow::Borrowed(p)))
    }

    pub fn custom(text: impl Into<String>) -> Self {
        Self(Cow::Owned(text.into()))
    }

    /// Draw one of the built-in style prompts uniformly from `rng`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let index = rng.gen_range(0..STYLE_PROMPTS.len());
        Self(Cow::Borrowed(STYLE_PROMPTS[index]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SeedPrompt {
    fn default() -> Self {
        Self(Cow::Borrowed(STYLE_PROMPTS[0]))
    }
}
