//! Slots: one item kind and a quantity
//!
//! A slot never holds more than its item's max stack, and an amount of zero
//! always means the item reference is cleared.

use crate::component::WeightComponent;
use crate::database::Database;
use crate::error::{InventoryError, Result};
use crate::item::{Item, ItemId};
use rand::Rng;
use std::sync::Arc;

/// Pack an item id and amount into the 32-bit slot encoding.
///
/// Item id sits in the low 16 bits, amount in the high 16 bits.
#[inline]
pub const fn pack(item_id: u16, amount: u16) -> u32 {
    (item_id as u32) | ((amount as u32) << 16)
}

/// Split a packed slot back into `(item_id, amount)`
#[inline]
pub const fn unpack(packed: u32) -> (u16, u16) {
    (packed as u16, (packed >> 16) as u16)
}

fn random_instance_id() -> i32 {
    rand::thread_rng().gen_range(0..i32::MAX)
}

/// An (item, quantity) pair
#[derive(Debug, Clone)]
pub struct Slot {
    item: Option<Arc<Item>>,
    amount: u16,
    /// Local tag telling apart slots with equal contents. Never packed.
    instance_id: i32,
}

impl Slot {
    /// Create an empty slot
    pub fn empty() -> Self {
        Self {
            item: None,
            amount: 0,
            instance_id: random_instance_id(),
        }
    }

    /// Create a slot holding `amount` of `item`, clamped to the item's max stack.
    /// A zero amount yields an empty slot.
    pub fn new(item: Arc<Item>, amount: u16) -> Self {
        let mut slot = Self::empty();
        slot.add_item(item, amount);
        slot
    }

    /// Rebuild a slot from its packed form, resolving the id through the catalog.
    /// An amount above the item's max stack is rejected rather than clamped.
    pub fn from_packed(packed: u32, database: &Database) -> Result<Self> {
        let (item_id, amount) = unpack(packed);
        if item_id == 0 || amount == 0 {
            return Ok(Self::empty());
        }
        let item = database.get_item(ItemId(item_id))?;
        if amount > item.max_stack() {
            return Err(InventoryError::AmountOverStack {
                item: item.id,
                amount,
                max_stack: item.max_stack(),
            });
        }
        Ok(Self::new(item, amount))
    }

    /// The referenced item, if any
    #[inline]
    pub fn item(&self) -> Option<&Arc<Item>> {
        self.item.as_ref()
    }

    /// Item id, or [`ItemId::EMPTY`]
    #[inline]
    pub fn item_id(&self) -> ItemId {
        self.item.as_ref().map(|i| i.id).unwrap_or(ItemId::EMPTY)
    }

    /// Current quantity
    #[inline]
    pub fn amount(&self) -> u16 {
        self.amount
    }

    /// Local instance tag
    #[inline]
    pub fn instance_id(&self) -> i32 {
        self.instance_id
    }

    /// Give this slot a fresh instance tag
    pub fn regenerate_instance_id(&mut self) {
        self.instance_id = random_instance_id();
    }

    /// Max stack of the held item (0 when empty)
    pub fn max_stack(&self) -> u16 {
        self.item.as_ref().map(|i| i.max_stack()).unwrap_or(0)
    }

    /// Room left before the stack is full
    pub fn remaining(&self) -> u16 {
        self.max_stack().saturating_sub(self.amount)
    }

    /// Check if the slot holds nothing
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.amount == 0
    }

    /// Check if more of the held item fits
    pub fn is_space(&self) -> bool {
        self.amount < self.max_stack()
    }

    /// Check if this slot holds `item`
    pub fn holds(&self, item: &Item) -> bool {
        !self.is_empty() && self.item_id() == item.id
    }

    /// amount × per-unit weight, 0 if the item carries no weight
    pub fn weight(&self) -> f32 {
        match &self.item {
            Some(item) if !self.is_empty() => item
                .component::<WeightComponent>()
                .map(|w| w.value * f32::from(self.amount))
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Add to the held item. Returns the amount that did not fit.
    pub fn add(&mut self, amount: u16) -> u16 {
        if amount == 0 || self.item.is_none() {
            return amount;
        }
        let to_add = amount.min(self.remaining());
        self.amount += to_add;
        amount - to_add
    }

    /// Bind to `item` and add. Only an empty slot or one already holding
    /// `item` accepts; otherwise the whole amount is returned.
    pub fn add_item(&mut self, item: Arc<Item>, amount: u16) -> u16 {
        if amount == 0 {
            return amount;
        }
        if self.is_empty() {
            self.item = Some(item);
        } else if self.item_id() != item.id {
            return amount;
        }
        let leftover = self.add(amount);
        if self.amount == 0 {
            self.item = None;
        }
        leftover
    }

    /// Remove from this slot. Returns the amount that could not be removed.
    pub fn remove(&mut self, amount: u16) -> u16 {
        if amount == 0 {
            return amount;
        }
        let to_remove = amount.min(self.amount);
        self.amount -= to_remove;
        if self.amount == 0 {
            self.item = None;
        }
        amount - to_remove
    }

    /// Packed `(item_id, amount)` form
    pub fn pack(&self) -> u32 {
        pack(self.item_id().raw(), self.amount)
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        self.item_id() == other.item_id()
            && self.amount == other.amount
            && self.instance_id == other.instance_id
    }
}

impl Eq for Slot {}

impl From<&Slot> for u32 {
    fn from(slot: &Slot) -> u32 {
        slot.pack()
    }
}
