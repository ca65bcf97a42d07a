// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! Global pipeline progress tracking.
//!
//! Uses atomics so it is safe to call from rayon worker threads. The CLI
//! polls [`get`] between chunks; embedding hosts can request cooperative
//! cancellation, which the pipeline honours at chunk boundaries.

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use super::error::StegoError;

static STEP: AtomicU64 = AtomicU64::new(0);
static TOTAL: AtomicU64 = AtomicU64::new(0);
static CANCELLED: AtomicBool = AtomicBool::new(false);

/// Reset progress to 0 and set the total unit count (0 = indeterminate).
/// Also resets the cancellation flag so a fresh operation starts clean.
pub fn init(total: u64) {
    CANCELLED.store(false, Ordering::Relaxed);
    STEP.store(0, Ordering::Relaxed);
    TOTAL.store(total, Ordering::Relaxed);
}

/// Request cancellation of the current operation.
///
/// The pipeline checks this flag at chunk boundaries and returns
/// `Err(StegoError::Cancelled)` when set.
pub fn cancel() {
    CANCELLED.store(true, Ordering::Relaxed);
}

/// Returns `true` if cancellation has been requested.
pub fn is_cancelled() -> bool {
    CANCELLED.load(Ordering::Relaxed)
}

/// Check for cancellation and return an error if requested.
pub fn check_cancelled() -> Result<(), StegoError> {
    if is_cancelled() {
        Err(StegoError::Cancelled)
    } else {
        Ok(())
    }
}

/// Advance progress by `units`, capped at the total when one is known.
pub fn advance(units: u64) {
    let total = TOTAL.load(Ordering::Relaxed);
    if total == 0 {
        STEP.fetch_add(units, Ordering::Relaxed);
    } else {
        let _ = STEP.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| {
            Some((s + units).min(total))
        });
    }
}

/// Read the current (step, total) progress.
pub fn get() -> (u64, u64) {
    (STEP.load(Ordering::Relaxed), TOTAL.load(Ordering::Relaxed))
}

/// Mark progress as complete (step = total).
pub fn finish() {
    let t = TOTAL.load(Ordering::Relaxed);
    STEP.store(t, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_caps_at_total() {
        init(10);
        advance(4);
        advance(100);
        assert_eq!(get(), (10, 10));
    }

    #[test]
    fn cancel_roundtrip() {
        init(5);
        assert!(check_cancelled().is_ok());
        cancel();
        assert!(matches!(check_cancelled(), Err(StegoError::Cancelled)));
        init(5);
        assert!(check_cancelled().is_ok());
    }
}
