// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Embedding progress tracking and cancellation.
//!
//! A [`Progress`] handle is owned by the caller and lent to a
//! [`CoverTextEncoder`](crate::stego::encoder::CoverTextEncoder). The encoder
//! sets the total to the number of chunks, advances once per generated token,
//! and checks the cancellation flag before every forward pass. Uses atomics
//! so another thread (a UI, a request timeout) can poll or cancel.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use super::error::StegoError;

#[derive(Debug, Default)]
pub struct Progress {
    step: AtomicU32,
    total: AtomicU32,
    cancelled: AtomicBool,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset progress to 0 and set the total step count.
    ///
    /// The cancellation flag is left as is: a handle cancelled before the
    /// embedding starts stays cancelled. Use [`reset`](Self::reset) to reuse
    /// a cancelled handle.
    pub fn init(&self, total: u32) {
        self.step.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    /// Clear the cancellation flag and the counters.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
        self.step.store(0, Ordering::Relaxed);
        self.total.store(0, Ordering::Relaxed);
    }

    /// Request cancellation of the current embedding.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Check for cancellation before a forward pass.
    ///
    /// An interrupted forward pass is reported as
    /// [`StegoError::ModelUnavailable`].
    pub fn check_cancelled(&self) -> Result<(), StegoError> {
        if self.is_cancelled() {
            Err(StegoError::ModelUnavailable("forward pass cancelled".into()))
        } else {
            Ok(())
        }
    }

    /// Advance by one step. Capped at total - 1 so the count never reaches
    /// 100% before [`finish`](Self::finish).
    pub fn advance(&self) {
        let total = self.total.load(Ordering::Relaxed);
        if total == 0 {
            self.step.fetch_add(1, Ordering::Relaxed);
        } else {
            let _ = self.step.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| {
                if s + 1 < total { Some(s + 1) } else { Some(s) }
            });
        }
    }

    /// Read the current (step, total) progress.
    pub fn get(&self) -> (u32, u32) {
        (self.step.load(Ordering::Relaxed), self.total.load(Ordering::Relaxed))
    }

    /// Mark progress as complete (step = total). An early stop by the
    /// stopping policy still finishes at 100%.
    pub fn finish(&self) {
        let t = self.total.load(Ordering::Relaxed);
        self.step.store(t, Ordering::Relaxed);
    }
}
