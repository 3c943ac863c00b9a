// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interfaces to the host UI framework.
//!
//! The virtualization core never positions anything itself. It talks to three
//! collaborators:
//!
//! - a [`SlotHost`], which owns the scrollable container, lays out slot
//!   placeholders, reports their geometry, and applies scroll positions,
//! - an [`ItemFactory`], which hands out (possibly pooled) item instances and
//!   takes them back,
//! - the items themselves, which bind to data through [`ItemView`].

use kurbo::{Affine, Point, Size, Vec2};

/// The four world-space corners of a (possibly transformed) rectangle.
///
/// Corner order does not matter to the core; only the axis-aligned bound of
/// the four points is used.
pub type Quad = [Point; 4];

/// How a freshly acquired item is placed inside its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPlacement {
    /// Copy the template's local position, scale, and rotation verbatim.
    Template,
    /// Stretch the item over its slot: anchors `0..1` on both axes, zero
    /// offsets, and a centered pivot.
    FillSlot,
}

/// Layout and scrolling services provided by the host framework.
///
/// A slot is an anonymous positional placeholder. The host decides how slots
/// are arranged (vertical list, grid, ...); the core only creates and destroys
/// them at the tail and asks where they ended up.
pub trait SlotHost {
    /// Host handle for one slot placeholder.
    type Slot;

    /// Creates a new slot placeholder that will sit at position `index` in
    /// the container.
    fn create_slot(&mut self, index: usize) -> Self::Slot;

    /// Destroys a slot placeholder previously returned by [`Self::create_slot`].
    fn destroy_slot(&mut self, slot: Self::Slot);

    /// Requests an immediate re-layout of the slot container.
    fn request_layout(&mut self);

    /// Polled once per tick after [`Self::request_layout`]; returns `true` each
    /// time the host reports that a layout commit has completed.
    fn layout_settled(&mut self) -> bool;

    /// World-space corners of the scrollable viewport, if the component has a
    /// distinct viewport.
    fn viewport_corners(&self) -> Option<Quad>;

    /// World-space corners of the component's own bounds.
    ///
    /// Used in place of the viewport when [`Self::viewport_corners`] returns
    /// `None`. Returning `None` from both means no container geometry exists yet.
    fn bounds_corners(&self) -> Option<Quad>;

    /// Transform from world space into the tracking canvas's local space.
    fn world_to_canvas(&self) -> Affine;

    /// World-space corners of a slot as currently laid out.
    fn slot_corners(&self, slot: &Self::Slot) -> Quad;

    /// Position of a slot within the scroll content, in content-local units.
    fn slot_content_position(&self, slot: &Self::Slot) -> Point;

    /// Size of a slot in content-local units.
    fn slot_size(&self, slot: &Self::Slot) -> Size;

    /// Size of the scroll content.
    fn content_size(&self) -> Size;

    /// Size of the scroll viewport.
    fn viewport_size(&self) -> Size;

    /// Applies a normalized (`0..=1` per axis) scroll position.
    ///
    /// Hosts are not required to emit a scroll-changed notification from
    /// here; the core re-evaluates visibility itself after calling this.
    fn set_normalized_scroll_position(&mut self, position: Vec2);
}

/// Source of item instances, typically a pool shared between many lists and
/// keyed by template.
///
/// `S` is the host's slot handle, used to parent a new item.
pub trait ItemFactory<S> {
    /// Item instance type.
    type Item;

    /// Returns an initialized instance parented to `slot` and placed per
    /// `placement`.
    ///
    /// Returns `None` when no template is configured yet.
    fn acquire(&mut self, slot: &S, placement: ItemPlacement) -> Option<Self::Item>;

    /// Takes an instance back. The caller holds no reference to it afterwards.
    fn release(&mut self, item: Self::Item);

    /// Releases pooled resources tied to this list's template.
    fn dispose(&mut self) {}
}

/// Data binding contract implemented by item instances.
pub trait ItemView<T> {
    /// Binds the item to `data`. Called once, right after the item is acquired.
    fn init(&mut self, data: &T);

    /// Re-renders the item from `data`, which may have been mutated in place.
    fn update_ui(&mut self, data: &T) {
        let _ = data;
    }
}
