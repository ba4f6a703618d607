//! Item catalog
//!
//! The database owns items, craft stations and recipes. Everything else
//! holds `Arc`s into it. Collections enumerate in insertion order.

use crate::component::ComponentRegistry;
use crate::config::{CatalogDefinition, ItemDefinition, RecipeDefinition};
use crate::error::{InventoryError, Result};
use crate::item::{Item, ItemId};
use crate::recipe::{CraftStation, Recipe};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Immutable reference data for items, stations and recipes
#[derive(Debug, Default)]
pub struct Database {
    items: Vec<Arc<Item>>,
    by_id: BTreeMap<ItemId, usize>,
    stations: Vec<Arc<CraftStation>>,
    recipes: Vec<Arc<Recipe>>,
}

impl Database {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a database from a catalog definition
    pub fn from_definition(
        definition: &CatalogDefinition,
        registry: &ComponentRegistry,
    ) -> Result<Self> {
        let mut database = Self::new();

        for def in &definition.items {
            database.add_item(build_item(def, registry)?)?;
        }
        for def in &definition.stations {
            database.add_station(CraftStation::new(def.name.clone()).with_icon(def.icon.clone()))?;
        }
        for def in &definition.recipes {
            let recipe = database.build_recipe(def)?;
            database.add_recipe(recipe);
        }

        log::debug!(
            "Loaded catalog: {} items, {} stations, {} recipes",
            database.items.len(),
            database.stations.len(),
            database.recipes.len()
        );
        Ok(database)
    }

    /// Parse a JSON catalog definition and build a database from it
    pub fn from_json(json: &str, registry: &ComponentRegistry) -> Result<Self> {
        let definition: CatalogDefinition = serde_json::from_str(json)?;
        Self::from_definition(&definition, registry)
    }

    /// Insert an item under its own id
    pub fn add_item(&mut self, item: Item) -> Result<Arc<Item>> {
        if item.id.is_empty() {
            return Err(InventoryError::ReservedItemId);
        }
        if self.by_id.contains_key(&item.id) {
            return Err(InventoryError::DuplicateItem(item.id));
        }
        let item = Arc::new(item);
        self.by_id.insert(item.id, self.items.len());
        self.items.push(item.clone());
        Ok(item)
    }

    /// Look up an item by id
    pub fn get_item(&self, id: ItemId) -> Result<Arc<Item>> {
        self.by_id
            .get(&id)
            .map(|&index| self.items[index].clone())
            .ok_or(InventoryError::UnknownItem(id))
    }

    /// Check if an id is taken
    pub fn has_item(&self, id: ItemId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Smallest unused id >= 1, or `None` when the id space is full
    pub fn new_item_id(&self) -> Option<ItemId> {
        let mut candidate: u16 = 1;
        // by_id iterates in ascending order
        for id in self.by_id.keys() {
            if id.raw() > candidate {
                break;
            }
            if id.raw() == candidate {
                candidate = candidate.checked_add(1)?;
            }
        }
        Some(ItemId(candidate))
    }

    /// All items, in insertion order
    pub fn items(&self) -> &[Arc<Item>] {
        &self.items
    }

    /// Insert a craft station. Names are unique.
    pub fn add_station(&mut self, station: CraftStation) -> Result<Arc<CraftStation>> {
        if self.stations.iter().any(|s| s.name == station.name) {
            return Err(InventoryError::InvalidDefinition(format!(
                "duplicate craft station '{}'",
                station.name
            )));
        }
        let station = Arc::new(station);
        self.stations.push(station.clone());
        Ok(station)
    }

    /// Look up a station by name
    pub fn station(&self, name: &str) -> Result<Arc<CraftStation>> {
        self.stations
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| InventoryError::UnknownStation(name.to_string()))
    }

    /// All stations, in insertion order
    pub fn stations(&self) -> &[Arc<CraftStation>] {
        &self.stations
    }

    /// Append a recipe, returning its index
    pub fn add_recipe(&mut self, recipe: Recipe) -> usize {
        self.recipes.push(Arc::new(recipe));
        self.recipes.len() - 1
    }

    /// Look up a recipe by index
    pub fn recipe(&self, index: usize) -> Result<&Arc<Recipe>> {
        self.recipes
            .get(index)
            .ok_or(InventoryError::UnknownRecipe(index))
    }

    /// Index of a recipe by name
    pub fn recipe_index(&self, name: &str) -> Option<usize> {
        self.recipes.iter().position(|r| r.name == name)
    }

    /// All recipes, in insertion order
    pub fn recipes(&self) -> &[Arc<Recipe>] {
        &self.recipes
    }

    fn build_recipe(&self, def: &RecipeDefinition) -> Result<Recipe> {
        if def.time_for_craft <= 0.0 {
            return Err(InventoryError::InvalidDefinition(format!(
                "recipe '{}' has non-positive craft time",
                def.name
            )));
        }
        if def.amount == 0 {
            return Err(InventoryError::InvalidDefinition(format!(
                "recipe '{}' produces nothing",
                def.name
            )));
        }

        let product = self.get_item(ItemId(def.product))?;
        let mut recipe = Recipe::new(def.name.clone(), product)
            .with_amount_of_product(def.amount)
            .with_time_for_craft(def.time_for_craft);
        for required in &def.required {
            recipe = recipe.with_required(self.get_item(ItemId(required.item))?, required.amount);
        }
        for station in &def.stations {
            recipe = recipe.with_station(self.station(station)?);
        }
        Ok(recipe)
    }
}

fn build_item(def: &ItemDefinition, registry: &ComponentRegistry) -> Result<Item> {
    let mut item = Item::new(def.id, def.name.clone())
        .with_description(def.description.clone())
        .with_category(def.category)
        .with_max_stack(def.max_stack);
    for component in &def.components {
        item = item.with_boxed_component(registry.create(&component.kind, &component.params)?);
    }
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::WeightComponent;
    use crate::item::ItemCategory;

    const CATALOG: &str = r#"{
        "items": [
            { "id": 1, "name": "Wood", "category": "material",
              "components": [ { "kind": "weight", "params": { "value": 0.5 } } ] },
            { "id": 2, "name": "Plank", "max_stack": 32 },
            { "id": 4, "name": "Torch", "components": [ { "kind": "drop" } ] }
        ],
        "stations": [ { "name": "workbench" } ],
        "recipes": [
            { "name": "Planks", "required": [ { "item": 1, "amount": 1 } ],
              "product": 2, "amount": 4, "time_for_craft": 2.0,
              "stations": [ "workbench" ] }
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let registry = ComponentRegistry::with_builtin();
        let db = Database::from_json(CATALOG, &registry).unwrap();

        assert_eq!(db.items().len(), 3);
        let wood = db.get_item(ItemId(1)).unwrap();
        assert_eq!(wood.category, ItemCategory::Material);
        assert_eq!(wood.max_stack(), 64);
        assert_eq!(wood.component::<WeightComponent>().unwrap().value, 0.5);
        assert_eq!(db.get_item(ItemId(2)).unwrap().max_stack(), 32);

        let recipe = db.recipe(0).unwrap();
        assert_eq!(recipe.amount_of_product(), 4);
        assert_eq!(recipe.need_craft_stations().len(), 1);
        assert_eq!(db.recipe_index("Planks"), Some(0));
    }

    #[test]
    fn test_unknown_references_fail() {
        let registry = ComponentRegistry::with_builtin();
        let missing_item = r#"{ "items": [ { "id": 1, "name": "Wood" } ],
            "recipes": [ { "name": "X", "required": [], "product": 9 } ] }"#;
        assert!(matches!(
            Database::from_json(missing_item, &registry),
            Err(InventoryError::UnknownItem(ItemId(9)))
        ));

        let missing_station = r#"{ "items": [ { "id": 1, "name": "Wood" } ],
            "recipes": [ { "name": "X", "required": [], "product": 1, "stations": ["forge"] } ] }"#;
        assert!(matches!(
            Database::from_json(missing_station, &registry),
            Err(InventoryError::UnknownStation(_))
        ));

        let missing_component = r#"{ "items": [ { "id": 1, "name": "Wood",
            "components": [ { "kind": "glow" } ] } ] }"#;
        assert!(matches!(
            Database::from_json(missing_component, &registry),
            Err(InventoryError::UnknownComponent(_))
        ));
    }

    #[test]
    fn test_bad_json() {
        let registry = ComponentRegistry::with_builtin();
        assert!(matches!(
            Database::from_json("{ items: ", &registry),
            Err(InventoryError::Json(_))
        ));
    }

    #[test]
    fn test_item_ids() {
        let mut db = Database::new();
        assert_eq!(db.new_item_id(), Some(ItemId(1)));

        db.add_item(Item::new(1, "A")).unwrap();
        db.add_item(Item::new(2, "B")).unwrap();
        db.add_item(Item::new(5, "C")).unwrap();
        assert_eq!(db.new_item_id(), Some(ItemId(3)));

        assert!(db.has_item(ItemId(5)));
        assert!(!db.has_item(ItemId(3)));
        assert!(matches!(db.add_item(Item::new(2, "D")), Err(InventoryError::DuplicateItem(_))));
        assert!(matches!(db.add_item(Item::new(0, "E")), Err(InventoryError::ReservedItemId)));
        assert!(matches!(db.get_item(ItemId(7)), Err(InventoryError::UnknownItem(ItemId(7)))));
    }

    #[test]
    fn test_stable_order() {
        let mut db = Database::new();
        db.add_item(Item::new(9, "Z")).unwrap();
        db.add_item(Item::new(3, "A")).unwrap();
        let names: Vec<_> = db.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Z", "A"]);
    }
}
