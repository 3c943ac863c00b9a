// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recognized options for a [`VirtualSlots`](crate::VirtualSlots) instance.

use core::num::NonZeroUsize;

use kurbo::Vec2;

/// Default number of slots created per population batch.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => panic!("default batch size must be non-zero"),
};

/// Configuration for slot population and item placement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualSlotsConfig {
    batch_size: NonZeroUsize,
    buffer: Vec2,
    override_item_rect: bool,
    debug_overlay: bool,
}

impl Default for VirtualSlotsConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            buffer: Vec2::ZERO,
            override_item_rect: false,
            debug_overlay: false,
        }
    }
}

impl VirtualSlotsConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many slots may be created per scheduling tick while growing.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the buffer margin, in slot-size units per axis.
    ///
    /// Negative components are clamped to zero.
    #[must_use]
    pub fn with_buffer(mut self, buffer: Vec2) -> Self {
        debug_assert!(
            buffer.is_finite(),
            "buffer margins must be finite; got {buffer:?}"
        );
        self.buffer = Vec2::new(buffer.x.max(0.0), buffer.y.max(0.0));
        self
    }

    /// Forces items to stretch over their slot instead of copying the
    /// template transform.
    #[must_use]
    pub const fn with_override_item_rect(mut self, enabled: bool) -> Self {
        self.override_item_rect = enabled;
        self
    }

    /// Enables the diagnostic overlay (see [`VirtualSlots::debug_overlay`](crate::VirtualSlots::debug_overlay)).
    #[must_use]
    pub const fn with_debug_overlay(mut self, enabled: bool) -> Self {
        self.debug_overlay = enabled;
        self
    }

    /// Slots created per tick while growing.
    #[must_use]
    pub const fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    /// Buffer margin in slot-size units per axis, never negative.
    ///
    /// Deserialized values bypass [`Self::with_buffer`], so the clamp is
    /// applied here as well.
    #[must_use]
    pub fn buffer(&self) -> Vec2 {
        Vec2::new(self.buffer.x.max(0.0), self.buffer.y.max(0.0))
    }

    /// Whether items are stretched over their slot.
    #[must_use]
    pub const fn override_item_rect(&self) -> bool {
        self.override_item_rect
    }

    /// Whether the diagnostic overlay is enabled.
    #[must_use]
    pub const fn debug_overlay(&self) -> bool {
        self.debug_overlay
    }
}
