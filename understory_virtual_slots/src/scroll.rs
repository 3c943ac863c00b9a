// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Normalized scroll targets that center a slot in the viewport.

use kurbo::{Point, Size, Vec2};

use crate::cancel::CancellationToken;

/// Normalized scroll position that brings a slot to the middle of the viewport.
///
/// Per axis, with `center = position + size / 2` and `half = viewport / 2`:
///
/// ```text
/// offset = center / (content - half)
/// x: offset -= (1 - offset) * (half / content)
/// y: offset += (1 - offset) * (half / content)
/// ```
///
/// and each axis is clamped to `0..=1`. The correction is subtracted on x and
/// added on y, matching hosts whose vertical scroll value runs opposite to
/// screen-space y. Degenerate axes (content not larger than half a viewport,
/// or zero content) resolve to `0`.
#[must_use]
pub fn centered_scroll_position(
    slot_position: Point,
    slot_size: Size,
    content_size: Size,
    viewport_size: Size,
) -> Vec2 {
    let x = axis_offset(
        slot_position.x + slot_size.width / 2.0,
        content_size.width,
        viewport_size.width / 2.0,
    );
    let y = axis_offset(
        slot_position.y + slot_size.height / 2.0,
        content_size.height,
        viewport_size.height / 2.0,
    );
    let x = x - (1.0 - x) * ratio(viewport_size.width / 2.0, content_size.width);
    let y = y + (1.0 - y) * ratio(viewport_size.height / 2.0, content_size.height);
    Vec2::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0))
}

fn axis_offset(center: f64, content: f64, half_viewport: f64) -> f64 {
    let span = content - half_viewport;
    if span > 0.0 { center / span } else { 0.0 }
}

fn ratio(half_viewport: f64, content: f64) -> f64 {
    if content > 0.0 {
        half_viewport / content
    } else {
        0.0
    }
}

/// A scroll-to request waiting for population to finish.
#[derive(Debug, Clone)]
pub struct ScrollTarget {
    index: usize,
    token: CancellationToken,
}

impl ScrollTarget {
    /// Creates a waiter for slot `index`.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            token: CancellationToken::new(),
        }
    }

    /// Requested slot index, unclamped.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Token that cancels this waiter.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}
