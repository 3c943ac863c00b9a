// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The slot pool and the resumable task that reconciles its size.
//!
//! Growing is amortized: each step creates at most `batch_size` slots, asks the
//! host to re-layout, and then waits for [`LAYOUT_SIGNALS`] layout commits
//! (one per tick) before running a visibility pass. Shrinking removes the whole
//! excess from the tail in one step, since destruction is cheap compared to
//! creation plus layout.
//!
//! There is no iteration cap. A host that never reports a settled layout stalls
//! population indefinitely.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::num::NonZeroUsize;

use crate::cancel::CancellationToken;
use crate::host::SlotHost;

/// Layout commits awaited after each growth or shrink step.
pub const LAYOUT_SIGNALS: u8 = 2;

/// Ordered positional placeholders, indices `0..len`.
#[derive(Debug)]
pub struct SlotPool<S> {
    slots: Vec<S>,
}

impl<S> Default for SlotPool<S> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<S> SlotPool<S> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the pool holds no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The slot at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&S> {
        self.slots.get(index)
    }

    /// The first slot, used as the size unit for buffer margins.
    #[must_use]
    pub fn first(&self) -> Option<&S> {
        self.slots.first()
    }

    /// All slots in index order.
    #[must_use]
    pub fn as_slice(&self) -> &[S] {
        &self.slots
    }

    /// Appends up to `batch` slots without exceeding `target`. Returns how many
    /// were created.
    pub(crate) fn grow<H>(&mut self, host: &mut H, target: usize, batch: NonZeroUsize) -> usize
    where
        H: SlotHost<Slot = S>,
    {
        let count = target.saturating_sub(self.slots.len()).min(batch.get());
        for _ in 0..count {
            let index = self.slots.len();
            self.slots.push(host.create_slot(index));
        }
        count
    }

    /// Destroys slots from the tail until at most `target` remain. Returns how
    /// many were destroyed.
    ///
    /// Items bound to the removed indices must already be released.
    pub(crate) fn truncate<H>(&mut self, host: &mut H, target: usize) -> usize
    where
        H: SlotHost<Slot = S>,
    {
        let mut removed = 0;
        while self.slots.len() > target {
            let Some(slot) = self.slots.pop() else {
                break;
            };
            host.destroy_slot(slot);
            removed += 1;
        }
        removed
    }
}

/// Operations a [`PopulationTask`] needs from its owner.
pub(crate) trait PopulationDriver {
    fn slot_count(&self) -> usize;
    fn grow_batch(&mut self, target: usize);
    fn shrink_to(&mut self, target: usize);
    fn request_layout(&mut self);
    fn layout_settled(&mut self) -> bool;
    fn run_visibility(&mut self);
}

/// What a call to [`PopulationTask::step`] ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PopulationStep {
    /// Suspended at a yield point; step again next tick.
    Yield,
    /// The slot count equals the target and a visibility pass has run.
    Complete,
    /// The task's token was cancelled; it will make no further progress.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Reconcile,
    AwaitLayout { signals_left: u8 },
}

/// Resumable state of one population run.
#[derive(Debug)]
pub struct PopulationTask {
    target: usize,
    phase: Phase,
    visibility_current: bool,
    token: CancellationToken,
}

impl PopulationTask {
    /// Creates a task that drives the slot count to `target`.
    #[must_use]
    pub fn new(target: usize) -> Self {
        Self {
            target,
            phase: Phase::Reconcile,
            visibility_current: false,
            token: CancellationToken::new(),
        }
    }

    /// Slot count this task is driving toward.
    #[must_use]
    pub const fn target(&self) -> usize {
        self.target
    }

    /// Token that cancels this task.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancels this task.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Advances until the next yield point or completion.
    pub(crate) fn step<D: PopulationDriver>(&mut self, driver: &mut D) -> PopulationStep {
        if self.token.is_cancelled() {
            return PopulationStep::Cancelled;
        }
        loop {
            match self.phase {
                Phase::AwaitLayout { signals_left } => {
                    if !driver.layout_settled() {
                        return PopulationStep::Yield;
                    }
                    let signals_left = signals_left.saturating_sub(1);
                    if signals_left > 0 {
                        self.phase = Phase::AwaitLayout { signals_left };
                        return PopulationStep::Yield;
                    }
                    driver.run_visibility();
                    self.visibility_current = true;
                    self.phase = Phase::Reconcile;
                }
                Phase::Reconcile => {
                    match driver.slot_count().cmp(&self.target) {
                        Ordering::Less => driver.grow_batch(self.target),
                        Ordering::Greater => driver.shrink_to(self.target),
                        Ordering::Equal => {
                            if !self.visibility_current {
                                driver.run_visibility();
                            }
                            return PopulationStep::Complete;
                        }
                    }
                    driver.request_layout();
                    self.visibility_current = false;
                    self.phase = Phase::AwaitLayout {
                        signals_left: LAYOUT_SIGNALS,
                    };
                    return PopulationStep::Yield;
                }
            }
        }
    }
}
