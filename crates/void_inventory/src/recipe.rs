//! Craft recipes and craft stations

use crate::item::Item;
use std::fmt;
use std::sync::Arc;

/// Default time a recipe takes, in seconds
pub const DEFAULT_TIME_FOR_CRAFT: f32 = 4.0;

/// A place a recipe may require the crafter to be near
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CraftStation {
    /// Unique name
    pub name: String,
    /// Icon path
    pub icon: String,
}

impl CraftStation {
    /// Create a new station
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: String::new(),
        }
    }

    /// Set icon path
    pub fn with_icon(mut self, path: impl Into<String>) -> Self {
        self.icon = path.into();
        self
    }
}

/// An ingredient line of a recipe
#[derive(Debug, Clone)]
pub struct RequiredItem {
    /// Material consumed
    pub item: Arc<Item>,
    /// Quantity consumed per craft
    pub amount: u16,
}

impl RequiredItem {
    /// Create an ingredient line
    pub fn new(item: Arc<Item>, amount: u16) -> Self {
        Self { item, amount }
    }
}

/// Maps required items to a product over a craft duration
#[derive(Clone)]
pub struct Recipe {
    /// Display name
    pub name: String,
    required_items: Vec<RequiredItem>,
    product: Arc<Item>,
    amount_of_product: u16,
    time_for_craft: f32,
    need_craft_stations: Vec<Arc<CraftStation>>,
}

impl Recipe {
    /// Create a recipe producing one `product`
    pub fn new(name: impl Into<String>, product: Arc<Item>) -> Self {
        Self {
            name: name.into(),
            required_items: Vec::new(),
            product,
            amount_of_product: 1,
            time_for_craft: DEFAULT_TIME_FOR_CRAFT,
            need_craft_stations: Vec::new(),
        }
    }

    /// Add an ingredient line
    pub fn with_required(mut self, item: Arc<Item>, amount: u16) -> Self {
        self.required_items.push(RequiredItem::new(item, amount));
        self
    }

    /// Set product amount (at least 1)
    pub fn with_amount_of_product(mut self, amount: u16) -> Self {
        self.amount_of_product = amount.max(1);
        self
    }

    /// Set craft duration in seconds. Non-positive values are ignored.
    pub fn with_time_for_craft(mut self, seconds: f32) -> Self {
        if seconds > 0.0 {
            self.time_for_craft = seconds;
        }
        self
    }

    /// Require a station nearby
    pub fn with_station(mut self, station: Arc<CraftStation>) -> Self {
        self.need_craft_stations.push(station);
        self
    }

    /// Ingredient lines, in order
    pub fn required_items(&self) -> &[RequiredItem] {
        &self.required_items
    }

    /// Produced item
    pub fn product(&self) -> &Arc<Item> {
        &self.product
    }

    /// Produced amount
    pub fn amount_of_product(&self) -> u16 {
        self.amount_of_product
    }

    /// Craft duration in seconds
    pub fn time_for_craft(&self) -> f32 {
        self.time_for_craft
    }

    /// Stations that must be near
    pub fn need_craft_stations(&self) -> &[Arc<CraftStation>] {
        &self.need_craft_stations
    }
}

impl fmt::Debug for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recipe")
            .field("name", &self.name)
            .field(
                "required",
                &self
                    .required_items
                    .iter()
                    .map(|r| (r.item.id, r.amount))
                    .collect::<Vec<_>>(),
            )
            .field("product", &(self.product.id, self.amount_of_product))
            .field("time_for_craft", &self.time_for_craft)
            .finish()
    }
}
