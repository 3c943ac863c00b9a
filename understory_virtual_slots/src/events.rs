// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item lifecycle notifications.
//!
//! Every notification is delivered synchronously, first to the owner's
//! [`ItemHooks`] implementation and then to each registered listener in
//! registration order.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// Override points for the component owner.
///
/// All methods default to doing nothing. They run before any listener
/// registered through [`VirtualSlots`](crate::VirtualSlots).
pub trait ItemHooks<T, I> {
    /// An item was acquired, placed in its slot, and initialized with `data`.
    fn item_created(&mut self, item: &I, data: &T) {
        let _ = (item, data);
    }

    /// An item is being released. `data` is the record currently at its index.
    fn item_removed(&mut self, item: &I, data: &T) {
        let _ = (item, data);
    }

    /// Population finished; `items` are the bound items in index order.
    fn generation_complete(&mut self, items: &[(usize, &I)]) {
        let _ = items;
    }
}

impl<T, I> ItemHooks<T, I> for () {}

type ItemListener<T, I> = Box<dyn FnMut(&I, &T)>;
type CompleteListener<I> = Box<dyn FnMut(&[(usize, &I)])>;

/// Registered public listeners.
pub(crate) struct Listeners<T, I> {
    item_created: Vec<ItemListener<T, I>>,
    item_removed: Vec<ItemListener<T, I>>,
    generation_complete: Vec<CompleteListener<I>>,
}

impl<T, I> Default for Listeners<T, I> {
    fn default() -> Self {
        Self {
            item_created: Vec::new(),
            item_removed: Vec::new(),
            generation_complete: Vec::new(),
        }
    }
}

impl<T, I> fmt::Debug for Listeners<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("item_created", &self.item_created.len())
            .field("item_removed", &self.item_removed.len())
            .field("generation_complete", &self.generation_complete.len())
            .finish()
    }
}

/// Hooks plus listeners, fired hook-first.
pub(crate) struct Notifier<K, T, I> {
    pub(crate) hooks: K,
    listeners: Listeners<T, I>,
}

impl<K: fmt::Debug, T, I> fmt::Debug for Notifier<K, T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("hooks", &self.hooks)
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl<K: ItemHooks<T, I>, T, I> Notifier<K, T, I> {
    pub(crate) fn new(hooks: K) -> Self {
        Self {
            hooks,
            listeners: Listeners::default(),
        }
    }

    pub(crate) fn listen_item_created(&mut self, listener: impl FnMut(&I, &T) + 'static) {
        self.listeners.item_created.push(Box::new(listener));
    }

    pub(crate) fn listen_item_removed(&mut self, listener: impl FnMut(&I, &T) + 'static) {
        self.listeners.item_removed.push(Box::new(listener));
    }

    pub(crate) fn listen_generation_complete(
        &mut self,
        listener: impl FnMut(&[(usize, &I)]) + 'static,
    ) {
        self.listeners.generation_complete.push(Box::new(listener));
    }

    pub(crate) fn item_created(&mut self, item: &I, data: &T) {
        self.hooks.item_created(item, data);
        for listener in &mut self.listeners.item_created {
            listener(item, data);
        }
    }

    pub(crate) fn item_removed(&mut self, item: &I, data: &T) {
        self.hooks.item_removed(item, data);
        for listener in &mut self.listeners.item_removed {
            listener(item, data);
        }
    }

    pub(crate) fn generation_complete(&mut self, items: &[(usize, &I)]) {
        self.hooks.generation_complete(items);
        for listener in &mut self.listeners.generation_complete {
            listener(items);
        }
    }
}
