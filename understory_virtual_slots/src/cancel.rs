// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cancellation for cooperative routines.

use alloc::rc::Rc;
use core::cell::Cell;

/// Shared flag used to stop an in-flight routine (population or scroll waiter).
///
/// Clones observe the same flag. Cancellation is sticky: once cancelled a
/// token never resets. Routines check the flag at their next yield point and
/// keep whatever side effects they had already applied.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    /// Creates a fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the routine owning this token.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Returns `true` once [`Self::cancel`] has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}
