//! Error types for the inventory system

use crate::item::ItemId;
use thiserror::Error;

/// Inventory and crafting errors
///
/// Quantities that do not fit or cannot be found are never errors; they are
/// returned as leftover/shortfall amounts.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Slot index past the end of a container
    #[error("Slot index {index} out of range (container has {len} slots)")]
    SlotOutOfRange { index: usize, len: usize },

    /// Crafting job index past the end of the job list
    #[error("Crafting job index {index} out of range ({len} jobs)")]
    JobOutOfRange { index: usize, len: usize },

    /// Item id not present in the catalog
    #[error("Unknown item id: {0}")]
    UnknownItem(ItemId),

    /// Item id 0 marks empty slots and cannot name an item
    #[error("Item id 0 is reserved for empty slots")]
    ReservedItemId,

    /// Two items share an id
    #[error("Duplicate item id: {0}")]
    DuplicateItem(ItemId),

    /// Recipe index not present in the catalog
    #[error("Unknown recipe index: {0}")]
    UnknownRecipe(usize),

    /// Craft station name not present in the catalog
    #[error("Unknown craft station: {0}")]
    UnknownStation(String),

    /// Component kind not registered
    #[error("Unknown item component kind: {0}")]
    UnknownComponent(String),

    /// Component parameters rejected by its constructor
    #[error("Invalid parameters for component '{kind}': {reason}")]
    InvalidComponent { kind: String, reason: String },

    /// Packed slot holds more than one stack of its item
    #[error("Packed amount {amount} of item {item} exceeds max stack {max_stack}")]
    AmountOverStack {
        item: ItemId,
        amount: u16,
        max_stack: u16,
    },

    /// Container configuration cannot be built
    #[error("Invalid container config: {0}")]
    InvalidConfig(String),

    /// Catalog definition is inconsistent
    #[error("Invalid catalog definition: {0}")]
    InvalidDefinition(String),

    /// JSON decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;
