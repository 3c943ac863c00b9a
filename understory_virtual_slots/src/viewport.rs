// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas-local viewport tracking and rectangle overlap.

use kurbo::{Affine, Rect, Size, Vec2};

use crate::host::{Quad, SlotHost};

/// Viewport rectangle used by one visibility pass.
///
/// All rectangles are in the tracking canvas's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    /// The physical viewport.
    pub raw: Rect,
    /// Size of one slot, used as the unit for buffer margins. Zero when no
    /// slot exists yet.
    pub buffer_unit: Size,
    /// The viewport grown by the buffer margin on every side. Visibility is
    /// tested against this.
    pub expanded: Rect,
}

/// Maps four world-space corners into canvas space and returns their
/// axis-aligned bound.
#[must_use]
pub fn canvas_rect(corners: &Quad, world_to_canvas: Affine) -> Rect {
    let first = world_to_canvas * corners[0];
    let rect = corners[1..]
        .iter()
        .fold(Rect::from_points(first, first), |rect, corner| {
            rect.union_pt(world_to_canvas * *corner)
        });
    debug_assert!(
        rect.is_finite(),
        "host reported non-finite geometry; got {rect:?}"
    );
    rect
}

/// Inclusive AABB intersection: rectangles sharing only an edge overlap.
#[must_use]
pub fn overlaps_inclusive(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Computes the buffer-expanded viewport.
///
/// Uses the host viewport if there is one and the component bounds otherwise.
/// `first_slot` supplies the buffer unit; `buffer` is the margin in slot-size
/// units per axis, applied symmetrically.
///
/// Returns `None` when the host has no container geometry yet.
pub fn compute_viewport_rect<H: SlotHost>(
    host: &H,
    first_slot: Option<&H::Slot>,
    world_to_canvas: Affine,
    buffer: Vec2,
) -> Option<ViewportRect> {
    let corners = host.viewport_corners().or_else(|| host.bounds_corners())?;
    let raw = canvas_rect(&corners, world_to_canvas);
    let buffer_unit = first_slot
        .map(|slot| canvas_rect(&host.slot_corners(slot), world_to_canvas).size())
        .unwrap_or(Size::ZERO);
    let expanded = raw.inflate(buffer.x * buffer_unit.width, buffer.y * buffer_unit.height);
    Some(ViewportRect {
        raw,
        buffer_unit,
        expanded,
    })
}

#[cfg(test)]
mod tests {
    use kurbo::{Affine, Point, Rect, Size, Vec2};

    use super::{canvas_rect, compute_viewport_rect, overlaps_inclusive};
    use crate::host::{Quad, SlotHost};
    use crate::test_support::ListHost;

    fn quad(rect: Rect) -> Quad {
        [
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
        ]
    }

    #[test]
    fn canvas_rect_applies_transform_and_normalizes() {
        let corners = quad(Rect::new(10.0, 20.0, 30.0, 40.0));
        // Mirror on x and scale by two.
        let xf = Affine::scale_non_uniform(-2.0, 2.0);
        let rect = canvas_rect(&corners, xf);
        assert_eq!(rect, Rect::new(-60.0, 40.0, -20.0, 80.0));
    }

    #[test]
    fn canvas_rect_bounds_rotated_corners() {
        let corners = quad(Rect::new(0.0, 0.0, 10.0, 10.0));
        let rect = canvas_rect(&corners, Affine::rotate(core::f64::consts::FRAC_PI_4));
        // A rotated square's bound is wider than the square itself.
        assert!(rect.width() > 14.0);
        assert!(rect.height() > 14.0);
    }

    #[test]
    fn overlap_is_inclusive_on_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(overlaps_inclusive(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
        assert!(overlaps_inclusive(a, Rect::new(0.0, 10.0, 10.0, 20.0)));
        assert!(overlaps_inclusive(a, Rect::new(2.0, 2.0, 3.0, 3.0)));
        assert!(!overlaps_inclusive(a, Rect::new(10.5, 0.0, 20.0, 10.0)));
        assert!(!overlaps_inclusive(a, Rect::new(0.0, -5.0, 10.0, -0.1)));
    }

    #[test]
    fn buffer_is_zero_without_slots() {
        let host = ListHost::new(Size::new(100.0, 10.0), Size::new(100.0, 35.0));
        let viewport =
            compute_viewport_rect(&host, None, Affine::IDENTITY, Vec2::new(1.0, 2.0)).unwrap();
        assert_eq!(viewport.buffer_unit, Size::ZERO);
        assert_eq!(viewport.raw, viewport.expanded);
        assert_eq!(viewport.raw, Rect::new(0.0, 0.0, 100.0, 35.0));
    }

    #[test]
    fn buffer_expands_in_slot_units_on_both_sides() {
        let mut host = ListHost::new(Size::new(100.0, 10.0), Size::new(100.0, 35.0));
        let slot = host.create_slot(0);
        let viewport = compute_viewport_rect(
            &host,
            Some(&slot),
            Affine::IDENTITY,
            Vec2::new(0.5, 2.0),
        )
        .unwrap();
        assert_eq!(viewport.buffer_unit, Size::new(100.0, 10.0));
        assert_eq!(viewport.expanded, Rect::new(-50.0, -20.0, 150.0, 55.0));
    }

    #[test]
    fn falls_back_to_bounds_then_gives_up() {
        let mut host = ListHost::new(Size::new(100.0, 10.0), Size::new(100.0, 35.0));
        host.has_viewport = false;
        let viewport = compute_viewport_rect(&host, None, Affine::IDENTITY, Vec2::ZERO).unwrap();
        assert_eq!(viewport.raw, Rect::new(0.0, 0.0, 100.0, 60.0));

        host.has_bounds = false;
        assert!(compute_viewport_rect(&host, None, Affine::IDENTITY, Vec2::ZERO).is_none());
    }
}
