//! Item components and the component registry
//!
//! Components are opt-in behavior attached to an [`Item`](crate::item::Item),
//! at most one per kind. The registry maps a kind name to a constructor so
//! catalog definitions can name components as data.

use crate::error::{InventoryError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

/// Behavior attached to an item
pub trait ItemComponent: Any + Send + Sync + fmt::Debug {
    /// Registry name of this kind
    fn kind(&self) -> &'static str;

    /// Get as Any reference (for downcasting)
    fn as_any(&self) -> &dyn Any;
}

/// Per-unit weight of an item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightComponent {
    /// Weight of a single unit
    pub value: f32,
}

impl WeightComponent {
    /// Registry name
    pub const KIND: &'static str = "weight";

    /// Create a weight component
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl Default for WeightComponent {
    fn default() -> Self {
        Self { value: 0.1 }
    }
}

impl ItemComponent for WeightComponent {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Marks an item as droppable into the world
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropComponent {
    /// Prefab the world spawns for one dropped unit
    pub prefab: String,
}

impl DropComponent {
    /// Registry name
    pub const KIND: &'static str = "drop";

    /// Create a drop component
    pub fn new(prefab: impl Into<String>) -> Self {
        Self {
            prefab: prefab.into(),
        }
    }
}

impl ItemComponent for DropComponent {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Object shown in hand while the item is selected on a hot bar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandObjectComponent {
    /// Prefab shown in hand
    pub prefab: String,
}

impl HandObjectComponent {
    /// Registry name
    pub const KIND: &'static str = "hand_object";

    /// Create a hand object component
    pub fn new(prefab: impl Into<String>) -> Self {
        Self {
            prefab: prefab.into(),
        }
    }
}

impl ItemComponent for HandObjectComponent {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Builds a component from JSON parameters
pub type ComponentConstructor =
    Box<dyn Fn(&serde_json::Value) -> Result<Box<dyn ItemComponent>> + Send + Sync>;

/// Name-keyed registry of constructible component kinds
pub struct ComponentRegistry {
    constructors: BTreeMap<String, ComponentConstructor>,
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Create a registry holding the built-in kinds
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register::<WeightComponent>(WeightComponent::KIND)
            .register::<DropComponent>(DropComponent::KIND)
            .register::<HandObjectComponent>(HandObjectComponent::KIND);
        registry
    }

    /// Register a kind that deserializes from its parameters.
    /// A `null` parameter value is read as an empty object.
    pub fn register<C>(&mut self, name: &str) -> &mut Self
    where
        C: ItemComponent + DeserializeOwned,
    {
        let kind = name.to_string();
        self.register_with(name, move |params| {
            let params = if params.is_null() {
                serde_json::Value::Object(serde_json::Map::new())
            } else {
                params.clone()
            };
            let component: C =
                serde_json::from_value(params).map_err(|e| InventoryError::InvalidComponent {
                    kind: kind.clone(),
                    reason: e.to_string(),
                })?;
            Ok(Box::new(component) as Box<dyn ItemComponent>)
        })
    }

    /// Register a kind with a custom constructor
    pub fn register_with<F>(&mut self, name: &str, constructor: F) -> &mut Self
    where
        F: Fn(&serde_json::Value) -> Result<Box<dyn ItemComponent>> + Send + Sync + 'static,
    {
        self.constructors
            .insert(name.to_string(), Box::new(constructor));
        self
    }

    /// Check if a kind is registered
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Construct a component by kind name
    pub fn create(&self, name: &str, params: &serde_json::Value) -> Result<Box<dyn ItemComponent>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| InventoryError::UnknownComponent(name.to_string()))?;
        constructor(params)
    }

    /// Registered kind names, sorted
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("kinds", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}
