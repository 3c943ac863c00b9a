// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse mapping from slot index to live item instance.

use alloc::vec::Vec;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::events::{ItemHooks, Notifier};
use crate::host::{ItemFactory, ItemPlacement, ItemView};

/// Result of [`ItemBinder::create_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindOutcome {
    /// A new item was bound.
    Created,
    /// Already bound or out of range; nothing happened.
    Skipped,
    /// The factory has no template to instantiate.
    NoTemplate,
}

/// Owns the items currently bound to slots.
///
/// At most one item exists per index, and every bound index is below both the
/// data length and the slot count at the time of binding. Most slots are
/// unbound at any instant, hence the map rather than a dense vector.
#[derive(Debug)]
pub struct ItemBinder<I> {
    items: HashMap<usize, I>,
}

impl<I> Default for ItemBinder<I> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
        }
    }
}

impl<I> ItemBinder<I> {
    /// Creates an empty binder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bound items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no item is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if an item is bound at `index`.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.items.contains_key(&index)
    }

    /// The item bound at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&I> {
        self.items.get(&index)
    }

    /// Bound indices in ascending order.
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.items.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// Bound items paired with their index, in ascending index order.
    #[must_use]
    pub fn sorted(&self) -> Vec<(usize, &I)> {
        let mut items: Vec<(usize, &I)> = self
            .items
            .iter()
            .map(|(index, item)| (*index, item))
            .collect();
        items.sort_unstable_by_key(|(index, _)| *index);
        items
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut I> {
        self.items.get_mut(&index)
    }

    /// Binds a new item at `index` unless it is already bound or out of range.
    ///
    /// The binding is registered before `init` and the created notification.
    pub(crate) fn create_at<T, S, F, K>(
        &mut self,
        index: usize,
        data: &[T],
        slots: &[S],
        factory: &mut F,
        placement: ItemPlacement,
        notifier: &mut Notifier<K, T, I>,
    ) -> BindOutcome
    where
        F: ItemFactory<S, Item = I>,
        I: ItemView<T>,
        K: ItemHooks<T, I>,
    {
        let (Some(slot), Some(record)) = (slots.get(index), data.get(index)) else {
            return BindOutcome::Skipped;
        };
        let Entry::Vacant(vacant) = self.items.entry(index) else {
            return BindOutcome::Skipped;
        };
        let Some(item) = factory.acquire(slot, placement) else {
            return BindOutcome::NoTemplate;
        };
        let item = vacant.insert(item);
        item.init(record);
        notifier.item_created(item, record);
        BindOutcome::Created
    }

    /// Unbinds and releases the item at `index`, if any.
    ///
    /// The binding is removed first. The removal notification carries the
    /// record currently at `index` and is skipped when `index` is past the end
    /// of `data`; the item is released either way.
    pub(crate) fn destroy_at<T, S, F, K>(
        &mut self,
        index: usize,
        data: &[T],
        factory: &mut F,
        notifier: &mut Notifier<K, T, I>,
    ) -> bool
    where
        F: ItemFactory<S, Item = I>,
        K: ItemHooks<T, I>,
    {
        let Some(item) = self.items.remove(&index) else {
            return false;
        };
        if let Some(record) = data.get(index) {
            notifier.item_removed(&item, record);
        }
        factory.release(item);
        true
    }
}
