// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic host doubles shared by the unit tests.
//!
//! [`ListHost`] lays slots out as a vertical list: slot `i` occupies
//! `y = i * h - scroll_y .. (i + 1) * h - scroll_y` in world space, with the
//! viewport at `0..viewport.height`.

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::events::ItemHooks;
use crate::host::{ItemFactory, ItemPlacement, ItemView, Quad, SlotHost};
use crate::{VirtualSlots, VirtualSlotsConfig};

pub(crate) fn quad(rect: Rect) -> Quad {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ]
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MockSlot {
    pub(crate) index: usize,
}

impl MockSlot {
    pub(crate) fn new(index: usize) -> Self {
        Self { index }
    }
}

#[derive(Debug)]
pub(crate) struct ListHost {
    pub(crate) slot_size: Size,
    pub(crate) viewport: Size,
    pub(crate) bounds: Size,
    pub(crate) scroll_y: f64,
    pub(crate) has_viewport: bool,
    pub(crate) has_bounds: bool,
    pub(crate) settles: bool,
    pub(crate) world_to_canvas: Affine,
    pub(crate) live: usize,
    pub(crate) destroyed: Vec<usize>,
    pub(crate) layout_requests: usize,
    pub(crate) scroll_positions: Vec<Vec2>,
}

impl ListHost {
    pub(crate) fn new(slot_size: Size, viewport: Size) -> Self {
        Self {
            slot_size,
            viewport,
            bounds: Size::new(viewport.width, 60.0),
            scroll_y: 0.0,
            has_viewport: true,
            has_bounds: true,
            settles: true,
            world_to_canvas: Affine::IDENTITY,
            live: 0,
            destroyed: Vec::new(),
            layout_requests: 0,
            scroll_positions: Vec::new(),
        }
    }

    /// Slot 100 wide and 10 tall in a viewport 35 tall: slots `0..=3` visible at rest.
    pub(crate) fn standard() -> Self {
        Self::new(Size::new(100.0, 10.0), Size::new(100.0, 35.0))
    }
}

impl SlotHost for ListHost {
    type Slot = MockSlot;

    fn create_slot(&mut self, index: usize) -> MockSlot {
        self.live += 1;
        MockSlot::new(index)
    }

    fn destroy_slot(&mut self, slot: MockSlot) {
        self.live -= 1;
        self.destroyed.push(slot.index);
    }

    fn request_layout(&mut self) {
        self.layout_requests += 1;
    }

    fn layout_settled(&mut self) -> bool {
        self.settles
    }

    fn viewport_corners(&self) -> Option<Quad> {
        self.has_viewport
            .then(|| quad(Rect::from_origin_size(Point::ZERO, self.viewport)))
    }

    fn bounds_corners(&self) -> Option<Quad> {
        self.has_bounds
            .then(|| quad(Rect::from_origin_size(Point::ZERO, self.bounds)))
    }

    fn world_to_canvas(&self) -> Affine {
        self.world_to_canvas
    }

    fn slot_corners(&self, slot: &MockSlot) -> Quad {
        let y0 = slot.index as f64 * self.slot_size.height - self.scroll_y;
        quad(Rect::new(
            0.0,
            y0,
            self.slot_size.width,
            y0 + self.slot_size.height,
        ))
    }

    fn slot_content_position(&self, slot: &MockSlot) -> Point {
        Point::new(0.0, slot.index as f64 * self.slot_size.height)
    }

    fn slot_size(&self, _slot: &MockSlot) -> Size {
        self.slot_size
    }

    fn content_size(&self) -> Size {
        Size::new(
            self.slot_size.width,
            self.live as f64 * self.slot_size.height,
        )
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn set_normalized_scroll_position(&mut self, position: Vec2) {
        self.scroll_positions.push(position);
        let range = (self.content_size().height - self.viewport.height).max(0.0);
        self.scroll_y = position.y * range;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Row {
    pub(crate) id: u32,
    pub(crate) parent: usize,
    pub(crate) placement: ItemPlacement,
    pub(crate) data: Option<String>,
    pub(crate) updates: usize,
}

impl ItemView<String> for Row {
    fn init(&mut self, data: &String) {
        self.data = Some(data.clone());
    }

    fn update_ui(&mut self, data: &String) {
        self.updates += 1;
        self.data = Some(data.clone());
    }
}

#[derive(Debug)]
pub(crate) struct RowPool {
    pub(crate) has_template: bool,
    pub(crate) next_id: u32,
    pub(crate) acquired: usize,
    pub(crate) released: Vec<u32>,
    pub(crate) disposed: bool,
}

impl Default for RowPool {
    fn default() -> Self {
        Self {
            has_template: true,
            next_id: 0,
            acquired: 0,
            released: Vec::new(),
            disposed: false,
        }
    }
}

impl ItemFactory<MockSlot> for RowPool {
    type Item = Row;

    fn acquire(&mut self, slot: &MockSlot, placement: ItemPlacement) -> Option<Row> {
        if !self.has_template {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.acquired += 1;
        Some(Row {
            id,
            parent: slot.index,
            placement,
            data: None,
            updates: 0,
        })
    }

    fn release(&mut self, item: Row) {
        self.released.push(item.id);
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }
}

/// Everything observable from the outside, in firing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    HookCreated(String),
    HookRemoved(String),
    Created(u32, String),
    Removed(u32, String),
    Complete(Vec<usize>),
}

pub(crate) type EventLog = Rc<RefCell<Vec<Event>>>;

#[derive(Debug)]
pub(crate) struct Recorder(pub(crate) EventLog);

impl ItemHooks<String, Row> for Recorder {
    fn item_created(&mut self, _item: &Row, data: &String) {
        self.0.borrow_mut().push(Event::HookCreated(data.clone()));
    }

    fn item_removed(&mut self, _item: &Row, data: &String) {
        self.0.borrow_mut().push(Event::HookRemoved(data.clone()));
    }
}

pub(crate) type TestList = VirtualSlots<String, ListHost, RowPool, Recorder>;

/// A started list over [`ListHost::standard`] with every notification logged.
pub(crate) fn harness(config: VirtualSlotsConfig) -> (TestList, EventLog) {
    harness_with(ListHost::standard(), RowPool::default(), config)
}

pub(crate) fn harness_with(
    host: ListHost,
    pool: RowPool,
    config: VirtualSlotsConfig,
) -> (TestList, EventLog) {
    let log = EventLog::default();
    let mut list = VirtualSlots::with_hooks(host, pool, Recorder(log.clone()), config);
    let sink = log.clone();
    list.on_item_created(move |item: &Row, data: &String| {
        sink.borrow_mut().push(Event::Created(item.id, data.clone()));
    });
    let sink = log.clone();
    list.on_item_removed(move |item: &Row, data: &String| {
        sink.borrow_mut().push(Event::Removed(item.id, data.clone()));
    });
    let sink = log.clone();
    list.on_generation_complete(move |items: &[(usize, &Row)]| {
        let indices = items.iter().map(|(index, _)| *index).collect();
        sink.borrow_mut().push(Event::Complete(indices));
    });
    list.start();
    (list, log)
}

/// Ticks until population finishes. Returns the number of ticks taken.
pub(crate) fn run_to_idle(list: &mut TestList) -> usize {
    let mut ticks = 0;
    while list.is_generating() {
        assert!(ticks < 10_000, "population did not settle");
        list.tick();
        ticks += 1;
    }
    ticks
}

/// Data records of the bound items, in index order.
pub(crate) fn bound_data(list: &TestList) -> Vec<(usize, String)> {
    list.bound_items()
        .into_iter()
        .map(|(index, row)| (index, row.data.clone().unwrap_or_default()))
        .collect()
}
