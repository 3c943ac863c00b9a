// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lifecycle controller: data source, slot population, visibility, and scrolling.

use alloc::vec::Vec;
use core::fmt;

use crate::binder::{BindOutcome, ItemBinder};
use crate::cancel::CancellationToken;
use crate::config::VirtualSlotsConfig;
use crate::debug::{DebugOverlay, DebugRect, MissingPrerequisites};
use crate::events::{ItemHooks, Notifier};
use crate::host::{ItemFactory, ItemPlacement, ItemView, SlotHost};
use crate::scroll::{ScrollTarget, centered_scroll_position};
use crate::slots::{PopulationDriver, PopulationStep, PopulationTask, SlotPool};
use crate::viewport::{canvas_rect, compute_viewport_rect};
use crate::visibility::{VisibilityPass, slot_is_visible};

/// Whether the slot population is being rebuilt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenerationState {
    /// Slot count matches the data source and no population is pending.
    #[default]
    Idle,
    /// A generation was requested and has not completed yet.
    Generating,
}

/// Whether the host is currently scheduling this component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Activity {
    /// Not started yet, or suspended. [`VirtualSlots::tick`] does nothing.
    #[default]
    Inactive,
    /// Ticked by the host every frame.
    Active,
    /// Torn down; all slots and items are gone.
    TornDown,
}

/// Virtualizes a list of `T` records over a bounded set of live items.
///
/// The controller keeps one slot per record (laid out by the host) and an item
/// only for slots whose bounds touch the buffer-expanded viewport. See the
/// crate docs for the overall flow.
///
/// Type parameters:
/// - `T`: data record type.
/// - `H`: the [`SlotHost`] providing layout and scrolling.
/// - `F`: the [`ItemFactory`] providing item instances.
/// - `K`: owner [`ItemHooks`], fired before public listeners. Defaults to `()`.
pub struct VirtualSlots<T, H, F, K = ()>
where
    H: SlotHost,
    F: ItemFactory<H::Slot>,
{
    config: VirtualSlotsConfig,
    host: H,
    factory: F,
    data: Vec<T>,
    pool: SlotPool<H::Slot>,
    binder: ItemBinder<F::Item>,
    notifier: Notifier<K, T, F::Item>,
    state: GenerationState,
    activity: Activity,
    population: Option<PopulationTask>,
    scroll_waiter: Option<ScrollTarget>,
    pending_scroll: Option<usize>,
    missing: MissingPrerequisites,
}

impl<T, H, F, K> fmt::Debug for VirtualSlots<T, H, F, K>
where
    H: SlotHost,
    F: ItemFactory<H::Slot>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualSlots")
            .field("config", &self.config)
            .field("records", &self.data.len())
            .field("slots", &self.pool.len())
            .field("items", &self.binder.len())
            .field("state", &self.state)
            .field("activity", &self.activity)
            .field("pending_scroll", &self.pending_scroll)
            .field("missing", &self.missing)
            .finish_non_exhaustive()
    }
}

impl<T, H, F> VirtualSlots<T, H, F>
where
    H: SlotHost,
    F: ItemFactory<H::Slot>,
    F::Item: ItemView<T>,
{
    /// Creates an inactive, empty controller without owner hooks.
    #[must_use]
    pub fn new(host: H, factory: F, config: VirtualSlotsConfig) -> Self {
        Self::with_hooks(host, factory, (), config)
    }
}

impl<T, H, F, K> VirtualSlots<T, H, F, K>
where
    H: SlotHost,
    F: ItemFactory<H::Slot>,
    F::Item: ItemView<T>,
    K: ItemHooks<T, F::Item>,
{
    /// Creates an inactive, empty controller with owner hooks.
    ///
    /// Call [`Self::start`] once the host begins ticking.
    #[must_use]
    pub fn with_hooks(host: H, factory: F, hooks: K, config: VirtualSlotsConfig) -> Self {
        Self {
            config,
            host,
            factory,
            data: Vec::new(),
            pool: SlotPool::new(),
            binder: ItemBinder::new(),
            notifier: Notifier::new(hooks),
            state: GenerationState::Idle,
            activity: Activity::Inactive,
            population: None,
            scroll_waiter: None,
            pending_scroll: None,
            missing: MissingPrerequisites::empty(),
        }
    }

    // --- Accessors ---

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &VirtualSlotsConfig {
        &self.config
    }

    /// Replaces the configuration. Takes effect at the next batch or visibility pass.
    pub fn set_config(&mut self, config: VirtualSlotsConfig) {
        self.config = config;
    }

    /// The host layout service.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host layout service.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The item factory.
    #[must_use]
    pub const fn factory(&self) -> &F {
        &self.factory
    }

    /// The owner hooks.
    #[must_use]
    pub const fn hooks(&self) -> &K {
        &self.notifier.hooks
    }

    /// Mutable access to the owner hooks.
    pub fn hooks_mut(&mut self) -> &mut K {
        &mut self.notifier.hooks
    }

    /// The current data source.
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// The slot placeholders.
    #[must_use]
    pub const fn slot_pool(&self) -> &SlotPool<H::Slot> {
        &self.pool
    }

    /// Number of slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.pool.len()
    }

    /// The item bound at `index`, if that slot is currently visible.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&F::Item> {
        self.binder.get(index)
    }

    /// The index-to-item bindings.
    #[must_use]
    pub const fn binder(&self) -> &ItemBinder<F::Item> {
        &self.binder
    }

    /// Indices with a bound item, ascending.
    #[must_use]
    pub fn bound_indices(&self) -> Vec<usize> {
        self.binder.indices()
    }

    /// Bound items with their index, ascending.
    #[must_use]
    pub fn bound_items(&self) -> Vec<(usize, &F::Item)> {
        self.binder.sorted()
    }

    /// Generation state.
    #[must_use]
    pub const fn state(&self) -> GenerationState {
        self.state
    }

    /// Returns `true` while a generation is in progress.
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.state == GenerationState::Generating
    }

    /// Scheduling state.
    #[must_use]
    pub const fn activity(&self) -> Activity {
        self.activity
    }

    /// Returns `true` while the host is ticking this component.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.activity == Activity::Active
    }

    /// Scroll target recorded while inactive, honored on the next activation.
    #[must_use]
    pub const fn pending_scroll_target(&self) -> Option<usize> {
        self.pending_scroll
    }

    /// The in-flight population, if any.
    #[must_use]
    pub const fn population(&self) -> Option<&PopulationTask> {
        self.population.as_ref()
    }

    /// Token cancelling the in-flight population.
    ///
    /// A population cancelled through this token leaves the controller in
    /// [`GenerationState::Generating`] until the next [`Self::generate`] or
    /// activation.
    #[must_use]
    pub fn generation_token(&self) -> Option<CancellationToken> {
        self.population.as_ref().map(|task| task.token().clone())
    }

    /// The scroll-to request waiting for population, if any.
    #[must_use]
    pub const fn scroll_target(&self) -> Option<&ScrollTarget> {
        self.scroll_waiter.as_ref()
    }

    /// Token cancelling the scroll-to request waiting for population.
    #[must_use]
    pub fn scroll_token(&self) -> Option<CancellationToken> {
        self.scroll_waiter.as_ref().map(|waiter| waiter.token().clone())
    }

    /// Prerequisites that have blocked an operation at least once.
    #[must_use]
    pub const fn missing_prerequisites(&self) -> MissingPrerequisites {
        self.missing
    }

    // --- Listeners ---

    /// Registers a listener fired after an item is created and initialized.
    pub fn on_item_created(&mut self, listener: impl FnMut(&F::Item, &T) + 'static) {
        self.notifier.listen_item_created(listener);
    }

    /// Registers a listener fired before an item is released.
    pub fn on_item_removed(&mut self, listener: impl FnMut(&F::Item, &T) + 'static) {
        self.notifier.listen_item_removed(listener);
    }

    /// Registers a listener fired when a generation completes.
    pub fn on_generation_complete(
        &mut self,
        listener: impl FnMut(&[(usize, &F::Item)]) + 'static,
    ) {
        self.notifier.listen_generation_complete(listener);
    }

    // --- Lifecycle ---

    /// Marks the component as scheduled.
    ///
    /// Starts a population requested while inactive and honors a pending
    /// scroll target. After [`Self::teardown`], slots are rebuilt for the
    /// retained data source.
    pub fn start(&mut self) {
        if self.activity == Activity::Active {
            return;
        }
        // Teardown destroyed every slot but kept the data source.
        if self.activity == Activity::TornDown && self.pool.len() != self.data.len() {
            self.state = GenerationState::Generating;
        }
        self.activity = Activity::Active;
        let stalled = self
            .population
            .as_ref()
            .is_none_or(|task| task.token().is_cancelled());
        if self.is_generating() && stalled {
            self.spawn_population();
        }
        if let Some(index) = self.pending_scroll.take() {
            self.scroll_to_index(index);
        }
    }

    /// Stops scheduling.
    ///
    /// The in-flight population is cancelled; a waiting scroll-to request
    /// becomes the pending scroll target. Slots and items are kept.
    pub fn suspend(&mut self) {
        if self.activity != Activity::Active {
            return;
        }
        self.activity = Activity::Inactive;
        if let Some(task) = self.population.take() {
            task.cancel();
        }
        if let Some(waiter) = self.scroll_waiter.take() {
            waiter.token().cancel();
            self.pending_scroll = Some(waiter.index());
        }
    }

    /// Reactivates after [`Self::suspend`], restarting an interrupted population.
    pub fn resume(&mut self) {
        self.start();
    }

    /// Cancels all routines, releases every item, destroys every slot, and
    /// disposes the factory's pooled resources.
    pub fn teardown(&mut self) {
        if let Some(task) = self.population.take() {
            task.cancel();
        }
        if let Some(waiter) = self.scroll_waiter.take() {
            waiter.token().cancel();
        }
        self.pending_scroll = None;
        self.destroy_all_items();
        self.pool.truncate(&mut self.host, 0);
        self.factory.dispose();
        self.state = GenerationState::Idle;
        self.activity = Activity::TornDown;
        #[cfg(feature = "tracing")]
        tracing::debug!(records = self.data.len(), "virtual slots torn down");
    }

    /// Per-frame entry point: advances population by one yield point, then
    /// polls a waiting scroll-to request.
    pub fn tick(&mut self) {
        if !self.is_active() {
            return;
        }
        self.advance_population();
        self.poll_scroll_waiter();
    }

    // --- Operations ---

    /// Replaces the data source and rebuilds.
    ///
    /// Cancels any in-flight population, releases every bound item (slots are
    /// kept), and starts reconciling the slot count to the new length. When
    /// active, the first batch runs before this returns.
    pub fn generate<D: IntoIterator<Item = T>>(&mut self, records: D) {
        if let Some(task) = self.population.take() {
            task.cancel();
        }
        self.data = records.into_iter().collect();
        self.destroy_all_items();
        self.state = GenerationState::Generating;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            records = self.data.len(),
            slots = self.pool.len(),
            active = self.is_active(),
            "generate"
        );
        if self.is_active() {
            self.spawn_population();
        }
    }

    /// Calls `update_ui` on the item bound at `index`.
    ///
    /// Returns `false` if `index` is out of range or not currently bound.
    pub fn refresh_at(&mut self, index: usize) -> bool {
        let (Some(item), Some(record)) = (self.binder.get_mut(index), self.data.get(index)) else {
            return false;
        };
        item.update_ui(record);
        true
    }

    /// Calls `update_ui` on the item bound to `record`.
    ///
    /// Returns `false` if `record` is not in the data source or not bound.
    pub fn refresh(&mut self, record: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(record).is_some_and(|index| self.refresh_at(index))
    }

    /// Calls `update_ui` on every bound item, in index order.
    pub fn refresh_all(&mut self) {
        for index in self.binder.indices() {
            self.refresh_at(index);
        }
    }

    /// Refreshes each of `records` that is currently bound.
    pub fn refresh_many(&mut self, records: &[T])
    where
        T: PartialEq,
    {
        for record in records {
            self.refresh(record);
        }
    }

    /// Centers the slot of `record` in the viewport. No-op if absent.
    pub fn scroll_to(&mut self, record: &T)
    where
        T: PartialEq,
    {
        if let Some(index) = self.index_of(record) {
            self.scroll_to_index(index);
        }
    }

    /// Centers slot `index` (clamped to the last slot) in the viewport.
    ///
    /// While generating, the request is deferred: when active it waits for the
    /// generation to complete, otherwise it becomes the pending scroll target.
    /// Any earlier waiting request is cancelled. With no slots this is a no-op.
    pub fn scroll_to_index(&mut self, index: usize) {
        if let Some(waiter) = self.scroll_waiter.take() {
            waiter.token().cancel();
        }
        if self.is_generating() {
            if self.is_active() {
                self.pending_scroll = None;
                self.scroll_waiter = Some(ScrollTarget::new(index));
            } else {
                self.pending_scroll = Some(index);
            }
            return;
        }
        self.pending_scroll = None;
        self.scroll_now(index);
    }

    /// Same as `scroll_to_index(0)`.
    pub fn scroll_to_beginning(&mut self) {
        self.scroll_to_index(0);
    }

    /// Scrolls to the last slot.
    pub fn scroll_to_end(&mut self) {
        self.scroll_to_index(usize::MAX);
    }

    /// Host notification that the scroll position changed.
    pub fn on_scroll_position_changed(&mut self) -> VisibilityPass {
        self.update_visibility()
    }

    /// Creates items for slots touching the expanded viewport and releases the
    /// rest, in index order.
    ///
    /// Idempotent: a second call with no intervening change returns an empty
    /// pass. Without container geometry this does nothing.
    pub fn update_visibility(&mut self) -> VisibilityPass {
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!("update_visibility", slots = self.pool.len()).entered();

        let mut pass = VisibilityPass::default();
        let world_to_canvas = self.host.world_to_canvas();
        let Some(viewport) = compute_viewport_rect(
            &self.host,
            self.pool.first(),
            world_to_canvas,
            self.config.buffer(),
        ) else {
            self.note_missing(MissingPrerequisites::CONTAINER_GEOMETRY);
            return pass;
        };

        for index in 0..self.pool.len() {
            let visible = self
                .pool
                .get(index)
                .is_some_and(|slot| slot_is_visible(&self.host, slot, world_to_canvas, &viewport));
            if visible {
                if self.create_at(index) {
                    pass.created.push(index);
                }
            } else if self.destroy_at(index) {
                pass.destroyed.push(index);
            }
        }

        #[cfg(feature = "tracing")]
        if !pass.is_empty() {
            tracing::trace!(
                created = pass.created.len(),
                destroyed = pass.destroyed.len(),
                bound = self.binder.len(),
                "visibility pass"
            );
        }
        pass
    }

    /// Releases every bound item. Slots are kept.
    pub fn destroy_all_items(&mut self) {
        for index in self.binder.indices() {
            self.destroy_at(index);
        }
    }

    /// Releases every bound item and the factory's pooled template resources.
    pub fn dispose(&mut self) {
        self.destroy_all_items();
        self.factory.dispose();
    }

    /// Viewport and slot rectangles for a diagnostic overlay.
    ///
    /// Returns `None` unless the overlay is enabled and container geometry exists.
    #[must_use]
    pub fn debug_overlay(&self) -> Option<DebugOverlay> {
        if !self.config.debug_overlay() {
            return None;
        }
        let world_to_canvas = self.host.world_to_canvas();
        let viewport = compute_viewport_rect(
            &self.host,
            self.pool.first(),
            world_to_canvas,
            self.config.buffer(),
        )?;
        let slots = self
            .pool
            .as_slice()
            .iter()
            .enumerate()
            .map(|(index, slot)| DebugRect {
                index,
                rect: canvas_rect(&self.host.slot_corners(slot), world_to_canvas),
                bound: self.binder.contains(index),
            })
            .collect();
        Some(DebugOverlay {
            viewport: viewport.raw,
            expanded_viewport: viewport.expanded,
            slots,
        })
    }

    // --- Internals ---

    fn index_of(&self, record: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.data.iter().position(|candidate| candidate == record)
    }

    fn spawn_population(&mut self) {
        self.population = Some(PopulationTask::new(self.data.len()));
        self.advance_population();
    }

    fn advance_population(&mut self) {
        let Some(mut task) = self.population.take() else {
            return;
        };
        match task.step(self) {
            PopulationStep::Yield => self.population = Some(task),
            PopulationStep::Complete => self.finish_generation(),
            PopulationStep::Cancelled => {}
        }
    }

    fn finish_generation(&mut self) {
        self.state = GenerationState::Idle;
        let items = self.binder.sorted();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            slots = self.pool.len(),
            items = items.len(),
            "generation complete"
        );
        self.notifier.generation_complete(&items);
    }

    fn poll_scroll_waiter(&mut self) {
        let Some(waiter) = self.scroll_waiter.take() else {
            return;
        };
        if waiter.token().is_cancelled() {
            return;
        }
        if self.is_generating() {
            self.scroll_waiter = Some(waiter);
            return;
        }
        self.scroll_now(waiter.index());
    }

    fn scroll_now(&mut self, index: usize) {
        let Some(last) = self.pool.len().checked_sub(1) else {
            return;
        };
        let Some(slot) = self.pool.get(index.min(last)) else {
            return;
        };
        let position = centered_scroll_position(
            self.host.slot_content_position(slot),
            self.host.slot_size(slot),
            self.host.content_size(),
            self.host.viewport_size(),
        );
        self.host.set_normalized_scroll_position(position);
        // Hosts do not reliably report programmatic scrolls.
        self.update_visibility();
    }

    fn create_at(&mut self, index: usize) -> bool {
        let placement = if self.config.override_item_rect() {
            ItemPlacement::FillSlot
        } else {
            ItemPlacement::Template
        };
        match self.binder.create_at(
            index,
            &self.data,
            self.pool.as_slice(),
            &mut self.factory,
            placement,
            &mut self.notifier,
        ) {
            BindOutcome::Created => true,
            BindOutcome::Skipped => false,
            BindOutcome::NoTemplate => {
                self.note_missing(MissingPrerequisites::ITEM_TEMPLATE);
                false
            }
        }
    }

    fn destroy_at(&mut self, index: usize) -> bool {
        self.binder.destroy_at::<T, H::Slot, F, K>(
            index,
            &self.data,
            &mut self.factory,
            &mut self.notifier,
        )
    }

    fn note_missing(&mut self, missing: MissingPrerequisites) {
        if self.missing.contains(missing) {
            return;
        }
        self.missing.insert(missing);
        #[cfg(feature = "tracing")]
        tracing::warn!(
            ?missing,
            "virtual slots prerequisite missing; skipping until initialized"
        );
    }
}

impl<T, H, F, K> PopulationDriver for VirtualSlots<T, H, F, K>
where
    H: SlotHost,
    F: ItemFactory<H::Slot>,
    F::Item: ItemView<T>,
    K: ItemHooks<T, F::Item>,
{
    fn slot_count(&self) -> usize {
        self.pool.len()
    }

    fn grow_batch(&mut self, target: usize) {
        self.pool.grow(&mut self.host, target, self.config.batch_size());
        #[cfg(feature = "tracing")]
        tracing::trace!(slots = self.pool.len(), target, "slot batch created");
    }

    fn shrink_to(&mut self, target: usize) {
        for index in (target..self.pool.len()).rev() {
            self.destroy_at(index);
        }
        self.pool.truncate(&mut self.host, target);
        #[cfg(feature = "tracing")]
        tracing::trace!(slots = self.pool.len(), "slot pool truncated");
    }

    fn request_layout(&mut self) {
        self.host.request_layout();
    }

    fn layout_settled(&mut self) -> bool {
        self.host.layout_settled()
    }

    fn run_visibility(&mut self) {
        self.update_visibility();
    }
}
