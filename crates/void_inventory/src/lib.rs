//! Void Inventory - Slots, Containers and Crafting
//!
//! Transaction core for item inventories in a real-time game.
//!
//! # Features
//!
//! - Immutable item catalog loaded from JSON, with pluggable item components
//! - Slots with a 32-bit wire encoding (`id | amount << 16`)
//! - Containers with slot limits, fixed-size layouts and change notifications
//! - Timed crafting jobs with station requirements and refundable cancel
//! - Compensating move / swap / trade between containers
//! - Item handler (pick, drop, open/close) and hot bar selection
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use void_inventory::prelude::*;
//!
//! let mut db = Database::new();
//! let wood = db.add_item(Item::new(1, "Wood")).unwrap();
//! let plank = db.add_item(Item::new(2, "Plank")).unwrap();
//! db.add_recipe(Recipe::new("Planks", plank.clone()).with_required(wood.clone(), 2));
//!
//! let chest = Container::new().into_shared();
//! chest.lock().add_item(&wood, 2);
//!
//! let mut crafter = Crafter::new(Arc::new(db), vec![chest.clone()], CrafterConfig::default());
//! assert!(crafter.craft(0).unwrap());
//! crafter.update(4.0).unwrap();
//! assert_eq!(chest.lock().amount_of(&plank), 1);
//! ```

pub mod component;
pub mod config;
pub mod container;
pub mod crafter;
pub mod crafting;
pub mod database;
pub mod error;
pub mod events;
pub mod handler;
pub mod hotbar;
pub mod item;
pub mod recipe;
pub mod slot;
pub mod transfer;

pub mod prelude {
    pub use crate::component::{
        ComponentRegistry, DropComponent, HandObjectComponent, ItemComponent, WeightComponent,
    };
    pub use crate::config::{CatalogDefinition, ContainerConfig, CrafterConfig};
    pub use crate::container::{Container, ContainerRef};
    pub use crate::crafter::Crafter;
    pub use crate::crafting::{CraftingJob, JobState};
    pub use crate::database::Database;
    pub use crate::error::{InventoryError, Result};
    pub use crate::handler::{ItemHandler, ItemObject};
    pub use crate::hotbar::HotBar;
    pub use crate::item::{Item, ItemCategory, ItemId};
    pub use crate::recipe::{CraftStation, Recipe, RequiredItem};
    pub use crate::slot::{pack, unpack, Slot};
    pub use crate::transfer::TransferOutcome;
}

pub use prelude::*;
