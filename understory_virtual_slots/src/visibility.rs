// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-slot visibility classification.

use kurbo::Affine;
use smallvec::SmallVec;

use crate::host::SlotHost;
use crate::viewport::{ViewportRect, canvas_rect, overlaps_inclusive};

/// Changes applied by one visibility pass, in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityPass {
    /// Indices that gained an item.
    pub created: SmallVec<[usize; 8]>,
    /// Indices whose item was released.
    pub destroyed: SmallVec<[usize; 8]>,
}

impl VisibilityPass {
    /// Returns `true` if the pass changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.destroyed.is_empty()
    }
}

/// Returns `true` if `slot`'s canvas-local bound touches the expanded viewport.
pub(crate) fn slot_is_visible<H: SlotHost>(
    host: &H,
    slot: &H::Slot,
    world_to_canvas: Affine,
    viewport: &ViewportRect,
) -> bool {
    let rect = canvas_rect(&host.slot_corners(slot), world_to_canvas);
    overlaps_inclusive(rect, viewport.expanded)
}
