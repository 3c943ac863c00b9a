// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Virtual Slots: slot-pool virtualization for scrollable containers.
//!
//! This crate keeps a scrollable list or grid of arbitrarily many records cheap
//! to display. It maintains one lightweight, anonymous **slot** per record,
//! which the host framework lays out like any other child, and binds a
//! heavyweight **item** only to slots whose bounds touch the viewport (grown by
//! a configurable buffer margin). Scrolling releases items that leave and
//! acquires items for slots that enter.
//!
//! The core concepts are:
//!
//! - [`SlotHost`]: the host's layout service. It creates and destroys slot
//!   placeholders, reports world-space geometry, signals layout commits, and
//!   applies normalized scroll positions.
//! - [`ItemFactory`] and [`ItemView`]: where items come from and how they bind
//!   to a record.
//! - [`VirtualSlots`]: the controller. [`VirtualSlots::generate`] replaces the
//!   data source and reconciles the slot count in batches, one yield point per
//!   [`VirtualSlots::tick`]; [`VirtualSlots::update_visibility`] binds and
//!   releases items; [`VirtualSlots::scroll_to`] centers a record's slot.
//! - [`ItemHooks`] plus registered listeners: synchronous notifications for item
//!   creation, removal, and generation completion. Hooks fire first.
//!
//! The crate never positions anything itself; all geometry is read back from
//! the host after layout, mapped into the canvas space given by
//! [`SlotHost::world_to_canvas`], and tested with an inclusive AABB overlap.
//!
//! ## Minimal example
//!
//! A vertical list whose host lays slots out 20 units apart:
//!
//! ```rust
//! use kurbo::{Affine, Point, Rect, Size, Vec2};
//! use understory_virtual_slots::{
//!     ItemFactory, ItemPlacement, ItemView, Quad, SlotHost, VirtualSlots, VirtualSlotsConfig,
//! };
//!
//! fn corners(r: Rect) -> Quad {
//!     [
//!         Point::new(r.x0, r.y0),
//!         Point::new(r.x1, r.y0),
//!         Point::new(r.x1, r.y1),
//!         Point::new(r.x0, r.y1),
//!     ]
//! }
//!
//! #[derive(Default)]
//! struct Column {
//!     slots: usize,
//!     scroll: f64,
//! }
//!
//! impl SlotHost for Column {
//!     type Slot = usize;
//!     fn create_slot(&mut self, index: usize) -> usize {
//!         self.slots += 1;
//!         index
//!     }
//!     fn destroy_slot(&mut self, _slot: usize) {
//!         self.slots -= 1;
//!     }
//!     fn request_layout(&mut self) {}
//!     fn layout_settled(&mut self) -> bool {
//!         true
//!     }
//!     fn viewport_corners(&self) -> Option<Quad> {
//!         Some(corners(Rect::new(0.0, 0.0, 200.0, 100.0)))
//!     }
//!     fn bounds_corners(&self) -> Option<Quad> {
//!         None
//!     }
//!     fn world_to_canvas(&self) -> Affine {
//!         Affine::IDENTITY
//!     }
//!     fn slot_corners(&self, slot: &usize) -> Quad {
//!         let y = *slot as f64 * 20.0 - self.scroll;
//!         corners(Rect::new(0.0, y, 200.0, y + 20.0))
//!     }
//!     fn slot_content_position(&self, slot: &usize) -> Point {
//!         Point::new(0.0, *slot as f64 * 20.0)
//!     }
//!     fn slot_size(&self, _slot: &usize) -> Size {
//!         Size::new(200.0, 20.0)
//!     }
//!     fn content_size(&self) -> Size {
//!         Size::new(200.0, self.slots as f64 * 20.0)
//!     }
//!     fn viewport_size(&self) -> Size {
//!         Size::new(200.0, 100.0)
//!     }
//!     fn set_normalized_scroll_position(&mut self, position: Vec2) {
//!         self.scroll = position.y * (self.content_size().height - 100.0).max(0.0);
//!     }
//! }
//!
//! struct Label(String);
//!
//! impl ItemView<u32> for Label {
//!     fn init(&mut self, data: &u32) {
//!         self.0 = data.to_string();
//!     }
//! }
//!
//! struct Labels;
//!
//! impl ItemFactory<usize> for Labels {
//!     type Item = Label;
//!     fn acquire(&mut self, _slot: &usize, _placement: ItemPlacement) -> Option<Label> {
//!         Some(Label(String::new()))
//!     }
//!     fn release(&mut self, _item: Label) {}
//! }
//!
//! let mut list: VirtualSlots<u32, _, _> =
//!     VirtualSlots::new(Column::default(), Labels, VirtualSlotsConfig::default());
//! list.start();
//! list.generate(0..1000_u32);
//!
//! // One yield point per frame until every record has a slot.
//! while list.is_generating() {
//!     list.tick();
//! }
//! assert_eq!(list.slot_count(), 1000);
//!
//! // Only slots touching the 100-unit viewport carry an item.
//! assert_eq!(list.bound_indices(), [0, 1, 2, 3, 4, 5]);
//! assert_eq!(list.item(5).map(|label| label.0.as_str()), Some("5"));
//! ```
//!
//! With the `tracing` feature, generation batches, visibility passes, and
//! missing prerequisites are logged through [`tracing`](https://docs.rs/tracing).
//! With the `serde` feature, [`VirtualSlotsConfig`] can be loaded from any
//! serde format.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod binder;
mod cancel;
mod config;
mod controller;
mod debug;
mod events;
mod host;
mod scroll;
mod slots;
mod viewport;
mod visibility;

#[cfg(test)]
mod test_support;

pub use binder::ItemBinder;
pub use cancel::CancellationToken;
pub use config::{DEFAULT_BATCH_SIZE, VirtualSlotsConfig};
pub use controller::{Activity, GenerationState, VirtualSlots};
pub use debug::{DebugOverlay, DebugRect, MissingPrerequisites};
pub use events::ItemHooks;
pub use host::{ItemFactory, ItemPlacement, ItemView, Quad, SlotHost};
pub use scroll::{ScrollTarget, centered_scroll_position};
pub use slots::{LAYOUT_SIGNALS, PopulationTask, SlotPool};
pub use viewport::{ViewportRect, canvas_rect, compute_viewport_rect, overlaps_inclusive};
pub use visibility::VisibilityPass;
