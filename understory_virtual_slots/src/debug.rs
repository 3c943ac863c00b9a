// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics: missing prerequisites and the optional geometry overlay.

use alloc::vec::Vec;

use kurbo::Rect;

bitflags::bitflags! {
    /// Prerequisites that were found missing at least once.
    ///
    /// Each flag is raised the first time the corresponding condition blocks an
    /// operation, which is also the only time it is logged.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MissingPrerequisites: u8 {
        /// The host reported neither viewport nor bounds geometry.
        const CONTAINER_GEOMETRY = 0b0000_0001;
        /// The item factory had no template to instantiate.
        const ITEM_TEMPLATE      = 0b0000_0010;
    }
}

/// One slot rectangle in the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugRect {
    /// Slot index.
    pub index: usize,
    /// Canvas-local bound of the slot.
    pub rect: Rect,
    /// Whether an item is currently bound to the slot.
    pub bound: bool,
}

/// Geometry snapshot for drawing a diagnostic overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugOverlay {
    /// Physical viewport, canvas-local.
    pub viewport: Rect,
    /// Viewport grown by the buffer margin.
    pub expanded_viewport: Rect,
    /// Every slot in index order.
    pub slots: Vec<DebugRect>,
}

impl DebugOverlay {
    /// Number of slots with a bound item.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.bound).count()
    }
}
