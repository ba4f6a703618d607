//! Item handler: picks, drops and moves items on behalf of one actor
//!
//! Dropping only publishes [`ItemDropped`]; spawning the world object is up
//! to the subscriber. Locks are taken one call at a time and never held
//! while this handler's own notifications are published.

use crate::component::DropComponent;
use crate::container::{Container, ContainerRef};
use crate::error::Result;
use crate::events::{AddedToContainer, HandlerClosed, HandlerOpened, ItemDropped, ItemPicked};
use crate::item::Item;
use crate::transfer::{self, Endpoints, TransferOutcome};
use std::sync::Arc;
use void_event::EventBus;

/// An item lying in the world
#[derive(Debug, Clone)]
pub struct ItemObject {
    /// Item the object stands for
    pub item: Arc<Item>,
    /// Whether a handler may pick it
    pub pickable: bool,
}

impl ItemObject {
    /// Create a pickable object
    pub fn new(item: Arc<Item>) -> Self {
        Self {
            item,
            pickable: true,
        }
    }

    /// Set whether the object can be picked
    pub fn set_pickable(&mut self, pickable: bool) {
        self.pickable = pickable;
    }
}

/// Run `f` with both containers locked. The same handle is locked once.
fn with_endpoints<R>(
    from: &ContainerRef,
    to: &ContainerRef,
    f: impl FnOnce(&mut Endpoints<'_>) -> R,
) -> R {
    if Arc::ptr_eq(from, to) {
        let mut guard = from.lock();
        return f(&mut Endpoints::Same(&mut *guard));
    }

    // Address order, so two handlers never lock a pair in opposite order
    let mut from_guard;
    let mut to_guard;
    if Arc::as_ptr(from) < Arc::as_ptr(to) {
        from_guard = from.lock();
        to_guard = to.lock();
    } else {
        to_guard = to.lock();
        from_guard = from.lock();
    }
    f(&mut Endpoints::Split {
        from: &mut *from_guard,
        to: &mut *to_guard,
    })
}

/// Handles items for an actor owning a default container
///
/// `move_between`, `swap_between` and `trade_between` hold both containers'
/// locks while the containers publish their notifications. Subscribers on
/// either container must not lock the other one.
pub struct ItemHandler {
    default_container: ContainerRef,
    opened: Vec<ContainerRef>,
    events: EventBus,
}

impl ItemHandler {
    /// Create a handler around its default container
    pub fn new(default_container: ContainerRef) -> Self {
        Self {
            default_container,
            opened: Vec::new(),
            events: EventBus::new(),
        }
    }

    /// Create a handler with a fresh container
    pub fn with_container(container: Container) -> Self {
        Self::new(container.into_shared())
    }

    /// The actor's own container
    pub fn default_container(&self) -> &ContainerRef {
        &self.default_container
    }

    /// Subscribe / unsubscribe to this handler's notifications
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Notification bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ---- world ----

    /// Drop `amount` units into the world, one notification per unit.
    /// Returns false if the item has no drop component.
    pub fn drop_item(&mut self, item: &Arc<Item>, amount: u16) -> bool {
        let Some(component) = item.component::<DropComponent>() else {
            return false;
        };
        if amount > 0 {
            log::debug!("Dropping {} x {}", amount, item.name);
        }
        for _ in 0..amount {
            self.events.publish(ItemDropped {
                item: item.clone(),
                prefab: component.prefab.clone(),
            });
        }
        true
    }

    /// Add to a container. With `drop_overflow`, whatever does not fit is
    /// dropped and 0 is returned, unless the item cannot be dropped.
    pub fn add_to_container(
        &mut self,
        container: &ContainerRef,
        item: &Arc<Item>,
        amount: u16,
        drop_overflow: bool,
    ) -> u16 {
        let leftover = container.lock().add_item(item, amount);
        if amount > leftover {
            self.events.publish(AddedToContainer {
                item: item.clone(),
                amount: amount - leftover,
            });
        }
        if drop_overflow && leftover > 0 && self.drop_item(item, leftover) {
            return 0;
        }
        leftover
    }

    /// Remove up to `amount` from `container[index]` and drop it. Items
    /// without a drop component stay put. Returns the quantity dropped.
    pub fn drop_from_container(&mut self, container: &ContainerRef, index: usize, amount: u16) -> u16 {
        let (item, removed) = {
            let mut guard = container.lock();
            let Some(item) = guard.slot(index).ok().and_then(|s| s.item().cloned()) else {
                return 0;
            };
            if !item.has_component::<DropComponent>() {
                return 0;
            }
            let removed = amount - guard.remove_item_at(index, amount);
            (item, removed)
        };
        self.drop_item(&item, removed);
        removed
    }

    /// Pick one world object into a container. Returns true if it was taken;
    /// the caller then despawns the object.
    pub fn pick_to_container(&mut self, container: &ContainerRef, object: &ItemObject) -> bool {
        if !object.pickable {
            return false;
        }
        if self.add_to_container(container, &object.item, 1, false) > 0 {
            return false;
        }
        self.events.publish(ItemPicked {
            item: object.item.clone(),
        });
        true
    }

    /// Pick into the default container
    pub fn pick(&mut self, object: &ItemObject) -> bool {
        let container = self.default_container.clone();
        self.pick_to_container(&container, object)
    }

    // ---- transfers ----

    /// Move up to `amount` from `from[index]` into `to`. What neither side
    /// can hold is dropped.
    pub fn move_between(
        &mut self,
        from: &ContainerRef,
        index: usize,
        amount: u16,
        to: &ContainerRef,
    ) -> Result<TransferOutcome> {
        let outcome = with_endpoints(from, to, |ends| transfer::move_items(ends, index, amount))?;
        self.drop_lost(&outcome);
        Ok(outcome)
    }

    /// Exchange two slots, possibly in the same container
    pub fn swap_between(
        &mut self,
        container: &ContainerRef,
        index: usize,
        other: &ContainerRef,
        other_index: usize,
    ) -> Result<()> {
        with_endpoints(container, other, |ends| {
            transfer::swap_slots(ends, index, other_index)
        })
    }

    /// Partial swap of `amount` from `container[index]` onto
    /// `other[other_index]`
    pub fn trade_between(
        &mut self,
        container: &ContainerRef,
        index: usize,
        other: &ContainerRef,
        other_index: usize,
        amount: u16,
    ) -> Result<TransferOutcome> {
        let outcome = with_endpoints(container, other, |ends| {
            transfer::trade(ends, index, other_index, amount)
        })?;
        self.drop_lost(&outcome);
        Ok(outcome)
    }

    fn drop_lost(&mut self, outcome: &TransferOutcome) {
        if outcome.lost == 0 {
            return;
        }
        if let Some(item) = &outcome.item {
            log::warn!("{} x {} did not fit anywhere", outcome.lost, item.name);
            if !self.drop_item(item, outcome.lost) {
                log::warn!("'{}' cannot be dropped; {} lost", item.name, outcome.lost);
            }
        }
    }

    // ---- open / close ----

    /// Containers this handler opened
    pub fn opened(&self) -> &[ContainerRef] {
        &self.opened
    }

    /// Check if this handler opened `container`
    pub fn is_opened(&self, container: &ContainerRef) -> bool {
        self.opened.iter().any(|c| Arc::ptr_eq(c, container))
    }

    /// Open a container and track it. Returns false if it was already
    /// tracked or already open.
    pub fn open(&mut self, container: &ContainerRef) -> bool {
        if self.is_opened(container) {
            return false;
        }
        self.opened.push(container.clone());
        if container.lock().is_open() {
            return false;
        }
        self.events.publish(HandlerOpened {
            container: container.clone(),
        });
        container.lock().open()
    }

    /// Close a tracked container. Returns false if it was not tracked or
    /// already closed.
    pub fn close(&mut self, container: &ContainerRef) -> bool {
        let Some(index) = self.opened.iter().position(|c| Arc::ptr_eq(c, container)) else {
            return false;
        };
        self.opened.remove(index);
        if !container.lock().is_open() {
            return false;
        }
        self.events.publish(HandlerClosed {
            container: container.clone(),
        });
        container.lock().close()
    }

    /// Open the default container
    pub fn open_default(&mut self) -> bool {
        let container = self.default_container.clone();
        self.open(&container)
    }

    /// Close the default container
    pub fn close_default(&mut self) -> bool {
        let container = self.default_container.clone();
        self.close(&container)
    }

    /// Close every tracked container. Returns how many were closed.
    pub fn close_all(&mut self) -> usize {
        let mut closed = 0;
        while let Some(container) = self.opened.first().cloned() {
            if self.close(&container) {
                closed += 1;
            }
        }
        closed
    }
}

impl std::fmt::Debug for ItemHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemHandler")
            .field("opened", &self.opened.len())
            .finish()
    }
}
