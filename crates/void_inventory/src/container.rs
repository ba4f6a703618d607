//! Container: an ordered sequence of slots
//!
//! Slot index is the addressing scheme shared with UI and replication, so
//! order is significant. Capacity policy:
//!
//! - `limited_slots`: `None` grows without bound, `Some(n)` stops at `n` slots
//! - `fixed_size`: the slot count never changes; emptied slots stay in place
//!   as empty placeholders. Without it, empty slots are pruned immediately.
//!
//! Every mutating call publishes its specific notification and then
//! [`ContainerChanged`], once per call, and only when something changed.

use crate::config::ContainerConfig;
use crate::error::{InventoryError, Result};
use crate::events::{
    ContainerChanged, ContainerClosed, ContainerOpened, ItemAdded, ItemRemoved, SlotAdded,
    SlotRemoved, SlotUpdated,
};
use crate::item::Item;
use crate::slot::Slot;
use parking_lot::Mutex;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;
use void_event::EventBus;

/// Container shared between crafters, handlers and hot bars.
///
/// Notifications are published with the container locked. A subscriber must
/// not lock the notifying container, and during an [`ItemHandler`] transfer
/// both containers of the pair are locked, so a subscriber on either one must
/// not lock the other.
///
/// [`ItemHandler`]: crate::handler::ItemHandler
pub type ContainerRef = Arc<Mutex<Container>>;

/// Ordered collection of slots with a capacity policy
pub struct Container {
    slots: Vec<Slot>,
    limited_slots: Option<usize>,
    fixed_size: bool,
    open: bool,
    events: EventBus,
}

impl Container {
    /// Create an unlimited, growable container
    pub fn new() -> Self {
        Self::build(&ContainerConfig::default())
    }

    /// Create a growable container of at most `max_slots` slots
    pub fn with_limit(max_slots: usize) -> Self {
        Self::build(&ContainerConfig::limited(max_slots))
    }

    /// Create a container of exactly `slots` empty slots
    pub fn fixed(slots: usize) -> Self {
        Self::build(&ContainerConfig::fixed(slots))
    }

    /// Create from configuration. A fixed-size config must name its slot
    /// count in `limited_slots`.
    pub fn from_config(config: &ContainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &ContainerConfig) -> Self {
        let slots = if config.fixed_size {
            let count = config.limited_slots.unwrap_or(0);
            (0..count).map(|_| Slot::empty()).collect()
        } else {
            Vec::new()
        };
        Self {
            slots,
            limited_slots: config.limited_slots,
            fixed_size: config.fixed_size,
            open: config.open,
            events: EventBus::new(),
        }
    }

    /// Wrap in a shared handle
    pub fn into_shared(self) -> ContainerRef {
        Arc::new(Mutex::new(self))
    }

    /// Subscribe / unsubscribe to this container's notifications
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Notification bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Number of slots, including empty placeholders
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no slot holds anything
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Slot::is_empty)
    }

    /// Slot cap, if any
    pub fn limited_slots(&self) -> Option<usize> {
        self.limited_slots
    }

    /// Check if the slot count is fixed
    pub fn is_fixed_size(&self) -> bool {
        self.fixed_size
    }

    /// Check if a new slot may be appended
    pub fn can_grow(&self) -> bool {
        !self.fixed_size && self.limited_slots.map_or(true, |limit| self.slots.len() < limit)
    }

    /// All slots, in order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Iterate over slots
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    /// Read a slot
    pub fn slot(&self, index: usize) -> Result<&Slot> {
        self.slots.get(index).ok_or(InventoryError::SlotOutOfRange {
            index,
            len: self.slots.len(),
        })
    }

    /// Index of a slot (matched by contents and instance tag)
    pub fn index_of(&self, slot: &Slot) -> Option<usize> {
        self.slots.iter().position(|s| s == slot)
    }

    /// Total weight of all slots
    pub fn weight(&self) -> f32 {
        self.slots.iter().map(Slot::weight).sum()
    }

    // ---- open / close ----

    /// Check if the container is open
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open. Returns false (and stays silent) if already open.
    pub fn open(&mut self) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        log::debug!("Container opened");
        self.events.publish(ContainerOpened);
        true
    }

    /// Close. Returns false (and stays silent) if already closed.
    pub fn close(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.open = false;
        log::debug!("Container closed");
        self.events.publish(ContainerClosed);
        true
    }

    // ---- item operations ----

    /// Add `amount` of `item`. Returns what could not be placed.
    ///
    /// Merges left to right into slots holding `item` (and, when fixed-size,
    /// into empty placeholders), then appends new stacks while the policy
    /// allows.
    pub fn add_item(&mut self, item: &Arc<Item>, amount: u16) -> u16 {
        if amount == 0 {
            return 0;
        }
        let fixed = self.fixed_size;
        let mut leftover = amount;
        for slot in &mut self.slots {
            if leftover == 0 {
                break;
            }
            if slot.holds(item) || (fixed && slot.is_empty()) {
                leftover = slot.add_item(item.clone(), leftover);
            }
        }
        leftover = self.append_stacks(item, leftover, None);
        self.notify_added(item, amount - leftover);
        leftover
    }

    /// Add into the slot at `index`, then fall back to new stacks placed at
    /// that position. Returns what could not be placed.
    pub fn add_item_at(&mut self, item: &Arc<Item>, index: usize, amount: u16) -> u16 {
        if amount == 0 {
            return 0;
        }
        let mut leftover = amount;
        let mut insert_at = index;
        if let Some(slot) = self.slots.get_mut(index) {
            leftover = slot.add_item(item.clone(), leftover);
            // Overflow stacks go right after a slot of the same kind
            if slot.holds(item) {
                insert_at = index + 1;
            }
        }
        leftover = self.append_stacks(item, leftover, Some(insert_at));
        self.notify_added(item, amount - leftover);
        leftover
    }

    /// Remove `amount` of `item` across slots. Returns the shortfall.
    pub fn remove_item(&mut self, item: &Arc<Item>, amount: u16) -> u16 {
        if amount == 0 {
            return 0;
        }
        let fixed = self.fixed_size;
        let mut shortfall = amount;
        let mut i = 0;
        while i < self.slots.len() && shortfall > 0 {
            let slot = &mut self.slots[i];
            if slot.holds(item) {
                shortfall = slot.remove(shortfall);
                if slot.is_empty() && !fixed {
                    self.slots.remove(i);
                    continue;
                }
            }
            i += 1;
        }
        self.notify_removed(item, amount - shortfall);
        shortfall
    }

    /// Remove from the slot at `index`. An invalid index or empty slot is a
    /// no-op returning the whole amount.
    pub fn remove_item_at(&mut self, index: usize, amount: u16) -> u16 {
        if amount == 0 {
            return 0;
        }
        let fixed = self.fixed_size;
        let Some(slot) = self.slots.get_mut(index) else {
            return amount;
        };
        let Some(item) = slot.item().cloned() else {
            return amount;
        };
        let shortfall = slot.remove(amount);
        if slot.is_empty() && !fixed {
            self.slots.remove(index);
        }
        self.notify_removed(&item, amount - shortfall);
        shortfall
    }

    /// Check if any slot holds `item`
    pub fn has(&self, item: &Item) -> bool {
        self.slots.iter().any(|s| s.holds(item))
    }

    /// Check if the slots together hold at least `amount` of `item`
    pub fn has_amount(&self, item: &Item, amount: u16) -> bool {
        let mut needed = u32::from(amount);
        if needed == 0 {
            return true;
        }
        for slot in self.slots.iter().filter(|s| s.holds(item)) {
            needed = needed.saturating_sub(u32::from(slot.amount()));
            if needed == 0 {
                return true;
            }
        }
        false
    }

    /// Total quantity of `item`
    pub fn amount_of(&self, item: &Item) -> u32 {
        self.slots
            .iter()
            .filter(|s| s.holds(item))
            .map(|s| u32::from(s.amount()))
            .sum()
    }

    // ---- raw slot operations ----

    /// Replace the slot at `index`. An invalid index is a no-op.
    ///
    /// Writing an empty slot into a growable container removes the slot
    /// instead, keeping empties pruned.
    pub fn set(&mut self, index: usize, slot: Slot) -> bool {
        if index >= self.slots.len() {
            return false;
        }
        if slot.is_empty() && !self.fixed_size {
            return self.remove_at(index).is_some();
        }
        self.slots[index] = slot;
        self.events.publish(SlotUpdated { index });
        self.events.publish(ContainerChanged);
        true
    }

    /// Append a slot. Refused for fixed-size containers, at the slot cap, or
    /// for an empty slot.
    pub fn push(&mut self, slot: Slot) -> bool {
        if slot.is_empty() || !self.can_grow() {
            return false;
        }
        self.slots.push(slot);
        let index = self.slots.len() - 1;
        self.events.publish(SlotAdded { index });
        self.events.publish(ContainerChanged);
        true
    }

    /// Remove the slot at `index`, returning it. A fixed-size container keeps
    /// an empty placeholder in its place. An invalid index is a no-op.
    pub fn remove_at(&mut self, index: usize) -> Option<Slot> {
        if index >= self.slots.len() {
            return None;
        }
        let removed = if self.fixed_size {
            let removed = std::mem::take(&mut self.slots[index]);
            self.events.publish(SlotUpdated { index });
            removed
        } else {
            let removed = self.slots.remove(index);
            self.events.publish(SlotRemoved { index });
            removed
        };
        self.events.publish(ContainerChanged);
        Some(removed)
    }

    /// Remove a slot by identity
    pub fn remove(&mut self, slot: &Slot) -> bool {
        match self.index_of(slot) {
            Some(index) => self.remove_at(index).is_some(),
            None => false,
        }
    }

    /// Exchange two slots in place
    pub fn swap_slots(&mut self, a: usize, b: usize) -> Result<()> {
        self.slot(a)?;
        self.slot(b)?;
        if a == b {
            return Ok(());
        }
        self.slots.swap(a, b);
        self.events.publish(SlotUpdated { index: a });
        self.events.publish(SlotUpdated { index: b });
        self.events.publish(ContainerChanged);
        Ok(())
    }

    /// Empty every slot (fixed-size containers keep their placeholders)
    pub fn clear(&mut self) {
        if self.fixed_size {
            self.slots.iter_mut().for_each(|s| *s = Slot::empty());
        } else {
            self.slots.clear();
        }
        self.events.publish(ContainerChanged);
    }

    fn append_stacks(&mut self, item: &Arc<Item>, mut leftover: u16, at: Option<usize>) -> u16 {
        let mut position = at.map(|index| index.min(self.slots.len()));
        while leftover > 0 && self.can_grow() {
            let slot = Slot::new(item.clone(), leftover);
            leftover -= slot.amount();
            match position.as_mut() {
                Some(index) => {
                    self.slots.insert(*index, slot);
                    *index += 1;
                }
                None => self.slots.push(slot),
            }
        }
        leftover
    }

    fn notify_added(&mut self, item: &Arc<Item>, amount: u16) {
        if amount == 0 {
            return;
        }
        log::trace!("Added {} x {} ({} slots)", amount, item.name, self.slots.len());
        self.events.publish(ItemAdded {
            item: item.clone(),
            amount,
        });
        self.events.publish(ContainerChanged);
    }

    fn notify_removed(&mut self, item: &Arc<Item>, amount: u16) {
        if amount == 0 {
            return;
        }
        log::trace!("Removed {} x {} ({} slots)", amount, item.name, self.slots.len());
        self.events.publish(ItemRemoved {
            item: item.clone(),
            amount,
        });
        self.events.publish(ContainerChanged);
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for Container {
    type Output = Slot;

    /// Panics when `index` is out of range
    fn index(&self, index: usize) -> &Slot {
        &self.slots[index]
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("slots", &self.slots.iter().map(|s| (s.item_id(), s.amount())).collect::<Vec<_>>())
            .field("limited_slots", &self.limited_slots)
            .field("fixed_size", &self.fixed_size)
            .field("open", &self.open)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::WeightComponent;
    use crate::item::ItemId;
    use approx::assert_relative_eq;

    fn item(id: u16, max_stack: u16) -> Arc<Item> {
        Arc::new(Item::new(id, format!("item-{id}")).with_max_stack(max_stack))
    }

    fn contents(container: &Container) -> Vec<(u16, u16)> {
        container
            .iter()
            .map(|s| (s.item_id().raw(), s.amount()))
            .collect()
    }

    /// Records notification names in order
    fn record(container: &mut Container) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let events = container.events_mut();
        let l = log.clone();
        events.subscribe(move |e: &ItemAdded| l.lock().push(format!("add:{}", e.amount)));
        let l = log.clone();
        events.subscribe(move |e: &ItemRemoved| l.lock().push(format!("remove:{}", e.amount)));
        let l = log.clone();
        events.subscribe(move |e: &SlotAdded| l.lock().push(format!("slot_added:{}", e.index)));
        let l = log.clone();
        events.subscribe(move |e: &SlotRemoved| l.lock().push(format!("slot_removed:{}", e.index)));
        let l = log.clone();
        events.subscribe(move |e: &SlotUpdated| l.lock().push(format!("update:{}", e.index)));
        let l = log.clone();
        events.subscribe(move |_: &ContainerChanged| l.lock().push("changed".into()));
        let l = log.clone();
        events.subscribe(move |_: &ContainerOpened| l.lock().push("open".into()));
        let l = log.clone();
        events.subscribe(move |_: &ContainerClosed| l.lock().push("close".into()));
        log
    }

    #[test]
    fn test_add_splits_into_stacks() {
        let a = item(1, 64);
        let mut container = Container::new();

        assert_eq!(container.add_item(&a, 100), 0);
        assert_eq!(contents(&container), [(1, 64), (1, 36)]);
    }

    #[test]
    fn test_add_merges_before_appending() {
        let a = item(1, 64);
        let mut container = Container::new();
        container.add_item(&a, 10);
        container.add_item(&a, 60);
        assert_eq!(contents(&container), [(1, 64), (1, 6)]);
    }

    #[test]
    fn test_limited_rejects_new_kind() {
        let a = item(1, 64);
        let b = item(2, 64);
        let mut container = Container::with_limit(1);

        assert_eq!(container.add_item(&a, 10), 0);
        let log = record(&mut container);
        assert_eq!(container.add_item(&b, 5), 5);
        assert_eq!(contents(&container), [(1, 10)]);
        // Nothing placed, nothing published
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_boundary_one_more_slot() {
        let a = item(1, 10);
        let mut container = Container::with_limit(2);
        container.add_item(&a, 4);

        // 6 fit in the first slot, 10 in the new one
        assert_eq!(container.add_item(&a, 16), 0);
        assert_eq!(contents(&container), [(1, 10), (1, 10)]);

        let mut container = Container::with_limit(2);
        container.add_item(&a, 4);
        assert_eq!(container.add_item(&a, 20), 4);
        assert_eq!(container.amount_of(&a), 20);
    }

    #[test]
    fn test_add_notifies_once_per_call() {
        let a = item(1, 8);
        let mut container = Container::new();
        let log = record(&mut container);

        container.add_item(&a, 20);
        assert_eq!(*log.lock(), ["add:20", "changed"]);
    }

    #[test]
    fn test_zero_amounts_are_noops() {
        let a = item(1, 8);
        let mut container = Container::new();
        let log = record(&mut container);

        assert_eq!(container.add_item(&a, 0), 0);
        assert_eq!(container.remove_item(&a, 0), 0);
        assert_eq!(container.remove_item_at(0, 0), 0);
        assert_eq!(container.len(), 0);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_add_then_remove_restores_growable() {
        let a = item(1, 16);
        let b = item(2, 16);
        let mut container = Container::new();
        container.add_item(&a, 7);
        container.add_item(&b, 3);
        let before_len = container.len();
        let before_amount = container.amount_of(&a);

        container.add_item(&a, 40);
        assert_eq!(container.remove_item(&a, 40), 0);

        assert_eq!(container.len(), before_len);
        assert_eq!(container.amount_of(&a), before_amount);
    }

    #[test]
    fn test_remove_prunes_and_reports_shortfall() {
        let a = item(1, 10);
        let b = item(2, 10);
        let mut container = Container::new();
        container.add_item(&a, 15);
        container.add_item(&b, 1);
        let log = record(&mut container);

        assert_eq!(container.remove_item(&a, 18), 3);
        assert_eq!(contents(&container), [(2, 1)]);
        assert_eq!(*log.lock(), ["remove:15", "changed"]);
    }

    #[test]
    fn test_fixed_size_keeps_placeholders() {
        let a = item(1, 10);
        let b = item(2, 10);
        let mut container = Container::fixed(3);
        assert_eq!(container.len(), 3);

        assert_eq!(container.add_item(&a, 12), 0);
        assert_eq!(contents(&container), [(1, 10), (1, 2), (0, 0)]);

        assert_eq!(container.add_item(&b, 15), 5);
        assert_eq!(container.len(), 3);

        container.remove_item(&a, 12);
        assert_eq!(contents(&container), [(0, 0), (0, 0), (2, 10)]);

        assert!(container.remove_at(2).is_some());
        assert_eq!(container.len(), 3);
        assert!(container.is_empty());
        assert!(!container.push(Slot::new(a, 1)));
    }

    #[test]
    fn test_add_item_at() {
        let a = item(1, 10);
        let b = item(2, 10);
        let mut container = Container::new();
        container.add_item(&a, 5);
        container.add_item(&b, 5);

        // Fills index 0, then inserts the rest there
        assert_eq!(container.add_item_at(&a, 0, 8), 0);
        assert_eq!(contents(&container), [(1, 10), (1, 3), (2, 5)]);

        // Different kind at index: new stack goes in front of it
        assert_eq!(container.add_item_at(&a, 2, 2), 0);
        assert_eq!(contents(&container), [(1, 10), (1, 3), (1, 2), (2, 5)]);
    }

    #[test]
    fn test_remove_item_at() {
        let a = item(1, 10);
        let mut container = Container::new();
        container.add_item(&a, 13);

        assert_eq!(container.remove_item_at(1, 5), 2);
        assert_eq!(contents(&container), [(1, 10)]);
        // Stale index
        assert_eq!(container.remove_item_at(5, 4), 4);
        assert_eq!(contents(&container), [(1, 10)]);
    }

    #[test]
    fn test_has() {
        let a = item(1, 10);
        let b = item(2, 10);
        let mut container = Container::new();
        container.add_item(&a, 25);

        assert!(container.has(&a));
        assert!(!container.has(&b));
        assert!(container.has_amount(&a, 25));
        assert!(!container.has_amount(&a, 26));
        assert!(container.has_amount(&b, 0));
        assert_eq!(container.amount_of(&a), 25);
    }

    #[test]
    fn test_read_out_of_range_fails() {
        let container = Container::new();
        assert!(matches!(
            container.slot(0),
            Err(InventoryError::SlotOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range_panics() {
        let container = Container::new();
        let _ = &container[3];
    }

    #[test]
    fn test_raw_operations_notify() {
        let a = item(1, 10);
        let b = item(2, 10);
        let mut container = Container::new();
        let log = record(&mut container);

        assert!(container.push(Slot::new(a.clone(), 3)));
        assert!(container.set(0, Slot::new(b.clone(), 4)));
        let slot = container[0].clone();
        assert!(container.remove(&slot));
        assert!(!container.set(4, Slot::new(a, 1)));
        assert!(container.remove_at(0).is_none());

        assert_eq!(
            *log.lock(),
            ["slot_added:0", "changed", "update:0", "changed", "slot_removed:0", "changed"]
        );
    }

    #[test]
    fn test_open_close_idempotent() {
        let mut container = Container::new();
        let log = record(&mut container);

        assert!(container.open());
        assert!(!container.open());
        assert!(container.is_open());
        assert!(container.close());
        assert!(!container.close());
        assert_eq!(*log.lock(), ["open", "close"]);
    }

    #[test]
    fn test_weight() {
        let stone = Arc::new(
            Item::new(1, "Stone")
                .with_max_stack(10)
                .with_component(WeightComponent::new(1.5)),
        );
        let feather = item(2, 10);
        let mut container = Container::new();
        container.add_item(&stone, 12);
        container.add_item(&feather, 5);

        assert_relative_eq!(container.weight(), 18.0);
    }

    #[test]
    fn test_swap_slots() {
        let a = item(1, 10);
        let b = item(2, 10);
        let mut container = Container::new();
        container.add_item(&a, 1);
        container.add_item(&b, 2);

        container.swap_slots(0, 1).unwrap();
        assert_eq!(container[0].item_id(), ItemId(2));
        assert!(container.swap_slots(0, 2).is_err());
    }

    #[test]
    fn test_clear() {
        let a = item(1, 10);
        let mut fixed = Container::fixed(2);
        fixed.add_item(&a, 4);
        fixed.clear();
        assert_eq!(fixed.len(), 2);
        assert!(fixed.is_empty());

        let mut growable = Container::new();
        growable.add_item(&a, 4);
        growable.clear();
        assert_eq!(growable.len(), 0);
    }

    #[test]
    fn test_from_config() {
        let fixed = Container::from_config(&ContainerConfig::fixed(3).opened()).unwrap();
        assert_eq!(fixed.len(), 3);
        assert!(fixed.is_open());

        let unsized_fixed = ContainerConfig {
            fixed_size: true,
            ..Default::default()
        };
        assert!(matches!(
            Container::from_config(&unsized_fixed),
            Err(InventoryError::InvalidConfig(_))
        ));
    }
}
