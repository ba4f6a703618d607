//! Item definitions
//!
//! Items are immutable catalog records. Once inserted into a
//! [`Database`](crate::database::Database) they are shared as `Arc<Item>` and
//! slots only hold references to them.

use crate::component::ItemComponent;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;

/// Stable numeric item identifier. `0` is reserved for "empty".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub u16);

impl ItemId {
    /// The id carried by empty slots
    pub const EMPTY: ItemId = ItemId(0);

    /// Check if this is the empty id
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Raw value
    #[inline]
    pub const fn raw(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for ItemId {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

/// Item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Tools and weapons
    Tool,
    /// Wearables
    Armor,
    /// Food, potions
    Consumable,
    /// Crafting ingredients
    Material,
    /// Placeable objects
    Placeable,
    /// Quest items
    Quest,
    /// Misc items
    Misc,
    /// Custom category
    Custom(u32),
}

impl Default for ItemCategory {
    fn default() -> Self {
        Self::Misc
    }
}

/// Default stack limit for new items
pub const DEFAULT_MAX_STACK: u16 = 64;

/// Item definition
pub struct Item {
    /// Unique identifier
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Category
    pub category: ItemCategory,
    /// Maximum stack size (>= 1)
    max_stack: u16,
    /// Attached behavioral components, one per kind
    components: BTreeMap<TypeId, Box<dyn ItemComponent>>,
}

impl Item {
    /// Create a new item definition
    pub fn new(id: u16, name: impl Into<String>) -> Self {
        Self {
            id: ItemId(id),
            name: name.into(),
            description: String::new(),
            category: ItemCategory::default(),
            max_stack: DEFAULT_MAX_STACK,
            components: BTreeMap::new(),
        }
    }

    /// Set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Set category
    pub fn with_category(mut self, category: ItemCategory) -> Self {
        self.category = category;
        self
    }

    /// Set max stack size (clamped to at least 1)
    pub fn with_max_stack(mut self, max: u16) -> Self {
        self.max_stack = max.max(1);
        self
    }

    /// Attach a component, replacing any component of the same kind
    pub fn with_component<C: ItemComponent>(self, component: C) -> Self {
        self.with_boxed_component(Box::new(component))
    }

    /// Attach an already boxed component
    pub fn with_boxed_component(mut self, component: Box<dyn ItemComponent>) -> Self {
        let type_id = <dyn Any>::type_id(component.as_any());
        self.components.insert(type_id, component);
        self
    }

    /// Maximum stack size
    #[inline]
    pub fn max_stack(&self) -> u16 {
        self.max_stack
    }

    /// Check if stackable
    pub fn is_stackable(&self) -> bool {
        self.max_stack > 1
    }

    /// Get a component by kind
    pub fn component<C: ItemComponent>(&self) -> Option<&C> {
        self.components
            .get(&TypeId::of::<C>())
            .and_then(|c| c.as_any().downcast_ref::<C>())
    }

    /// Check if a component kind is attached
    pub fn has_component<C: ItemComponent>(&self) -> bool {
        self.components.contains_key(&TypeId::of::<C>())
    }

    /// Iterate over attached components
    pub fn components(&self) -> impl Iterator<Item = &dyn ItemComponent> {
        self.components.values().map(|c| c.as_ref())
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("max_stack", &self.max_stack)
            .field(
                "components",
                &self.components().map(|c| c.kind()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
