//! Inventory configuration and catalog definitions

use crate::error::{InventoryError, Result};
use crate::item::{ItemCategory, DEFAULT_MAX_STACK};
use crate::recipe::DEFAULT_TIME_FOR_CRAFT;
use serde::{Deserialize, Serialize};

/// Container capacity and initial state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Maximum slot count (`None` = unlimited)
    pub limited_slots: Option<usize>,

    /// Keep the slot count fixed; emptied slots stay as placeholders.
    /// Requires `limited_slots`; the container starts with that many empty slots.
    pub fixed_size: bool,

    /// Start opened
    pub open: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            limited_slots: None,
            fixed_size: false,
            open: false,
        }
    }
}

impl ContainerConfig {
    /// Growable container holding at most `slots` slots
    pub fn limited(slots: usize) -> Self {
        Self {
            limited_slots: Some(slots),
            ..Default::default()
        }
    }

    /// Fixed container of exactly `slots` slots
    pub fn fixed(slots: usize) -> Self {
        Self {
            limited_slots: Some(slots),
            fixed_size: true,
            ..Default::default()
        }
    }

    /// Start opened
    pub fn opened(mut self) -> Self {
        self.open = true;
        self
    }
    /// Check the capacity policy is buildable
    pub fn validate(&self) -> Result<()> {
        if self.fixed_size && self.limited_slots.is_none() {
            return Err(InventoryError::InvalidConfig(
                "fixed_size requires limited_slots".to_string(),
            ));
        }
        Ok(())
    }
}

/// Crafter behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrafterConfig {
    /// Finished jobs deposit their product on the next update
    pub can_finish_craft: bool,

    /// Cap the number of concurrent jobs
    pub limit_crafts: bool,

    /// Job cap when `limit_crafts` is set
    pub crafts_limit: u32,

    /// Accept proximity enter/leave notifications
    pub track_near_stations: bool,
}

impl Default for CrafterConfig {
    fn default() -> Self {
        Self {
            can_finish_craft: true,
            limit_crafts: true,
            crafts_limit: 8,
            track_near_stations: false,
        }
    }
}

impl CrafterConfig {
    /// No cap on concurrent jobs
    pub fn unlimited(mut self) -> Self {
        self.limit_crafts = false;
        self
    }

    /// Cap concurrent jobs
    pub fn with_crafts_limit(mut self, limit: u32) -> Self {
        self.limit_crafts = true;
        self.crafts_limit = limit;
        self
    }

    /// Accept proximity notifications
    pub fn with_station_tracking(mut self) -> Self {
        self.track_near_stations = true;
        self
    }
}

/// Serialized catalog: items, stations, then recipes referring to both
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogDefinition {
    pub items: Vec<ItemDefinition>,
    pub stations: Vec<StationDefinition>,
    pub recipes: Vec<RecipeDefinition>,
}

fn default_max_stack() -> u16 {
    DEFAULT_MAX_STACK
}

fn default_amount() -> u16 {
    1
}

fn default_time_for_craft() -> f32 {
    DEFAULT_TIME_FOR_CRAFT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: ItemCategory,
    #[serde(default = "default_max_stack")]
    pub max_stack: u16,
    #[serde(default)]
    pub components: Vec<ComponentDefinition>,
}

/// A component named by registry kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDefinition {
    pub kind: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationDefinition {
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredItemDefinition {
    pub item: u16,
    pub amount: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDefinition {
    pub name: String,
    #[serde(default)]
    pub required: Vec<RequiredItemDefinition>,
    /// Product item id
    pub product: u16,
    /// Product amount
    #[serde(default = "default_amount")]
    pub amount: u16,
    #[serde(default = "default_time_for_craft")]
    pub time_for_craft: f32,
    /// Station names
    #[serde(default)]
    pub stations: Vec<String>,
}
