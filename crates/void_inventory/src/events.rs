//! Notifications published by containers, crafters, handlers and hot bars
//!
//! Each kind is its own type so subscribers attach to exactly the kinds they
//! care about. For any single mutating call the specific notification is
//! published before [`ContainerChanged`].

use crate::container::ContainerRef;
use crate::item::Item;
use crate::recipe::CraftStation;
use crate::slot::Slot;
use std::sync::Arc;

// Container

/// Items were placed by `add_item` / `add_item_at`
#[derive(Debug, Clone)]
pub struct ItemAdded {
    /// Item placed
    pub item: Arc<Item>,
    /// Quantity actually placed
    pub amount: u16,
}

/// Items were taken by `remove_item` / `remove_item_at`
#[derive(Debug, Clone)]
pub struct ItemRemoved {
    /// Item taken
    pub item: Arc<Item>,
    /// Quantity actually removed
    pub amount: u16,
}

/// A raw slot was appended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAdded {
    /// Index of the new slot
    pub index: usize,
}

/// A slot was removed from the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRemoved {
    /// Index the slot had
    pub index: usize,
}

/// A slot was replaced in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotUpdated {
    /// Index of the replaced slot
    pub index: usize,
}

/// Something in the container changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerChanged;

/// Container went from closed to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerOpened;

/// Container went from open to closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerClosed;

// Crafter

/// A job finished and its product was deposited
#[derive(Debug, Clone)]
pub struct Crafted {
    /// Recipe of the finished job
    pub recipe_index: usize,
    /// Product quantity no container could accept
    pub undelivered: u16,
}

/// Materials were consumed and a job was queued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CraftRequested {
    /// Recipe of the queued job
    pub recipe_index: usize,
}

/// A pending job was cancelled and its materials refunded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CraftCancelled {
    /// Recipe of the cancelled job
    pub recipe_index: usize,
}

/// A job was appended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobAdded {
    /// Index of the new job
    pub index: usize,
    /// Recipe it crafts
    pub recipe_index: usize,
}

/// A job was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobRemoved {
    /// Index the job had
    pub index: usize,
}

/// A job was replaced in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobUpdated {
    /// Index of the replaced job
    pub index: usize,
}

/// A craft station came into range
#[derive(Debug, Clone)]
pub struct NearStationAdded {
    /// Station now in range
    pub station: Arc<CraftStation>,
}

/// A craft station went out of range
#[derive(Debug, Clone)]
pub struct NearStationRemoved {
    /// Station no longer in range
    pub station: Arc<CraftStation>,
}

// Item handler

/// One unit was handed to the world. Spawning the object is up to the subscriber.
#[derive(Debug, Clone)]
pub struct ItemDropped {
    /// Item dropped
    pub item: Arc<Item>,
    /// Prefab to spawn, from the drop component
    pub prefab: String,
}

/// A world object was picked into a container
#[derive(Debug, Clone)]
pub struct ItemPicked {
    /// Item picked
    pub item: Arc<Item>,
}

/// The handler added items to a container
#[derive(Debug, Clone)]
pub struct AddedToContainer {
    /// Item added
    pub item: Arc<Item>,
    /// Quantity the container accepted
    pub amount: u16,
}

/// The handler is opening a container
#[derive(Debug, Clone)]
pub struct HandlerOpened {
    /// Container being opened
    pub container: ContainerRef,
}

/// The handler is closing a container
#[derive(Debug, Clone)]
pub struct HandlerClosed {
    /// Container being closed
    pub container: ContainerRef,
}

// Hot bar

/// Hot bar selection moved
#[derive(Debug, Clone)]
pub struct SelectionChanged {
    /// New selection index
    pub index: usize,
    /// Contents of the selected slot
    pub slot: Option<Slot>,
}
