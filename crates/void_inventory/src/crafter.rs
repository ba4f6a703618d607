//! Crafter: turns materials from shared containers into products over time
//!
//! Materials are consumed when a craft is accepted. The product is deposited
//! on the update in which the job finishes, provided finishing is enabled.
//! A pending job can be cancelled, refunding its materials.

use crate::config::CrafterConfig;
use crate::container::ContainerRef;
use crate::crafting::{CraftingJob, Withdrawal};
use crate::database::Database;
use crate::error::{InventoryError, Result};
use crate::events::{
    CraftCancelled, CraftRequested, Crafted, JobAdded, JobRemoved, JobUpdated, NearStationAdded,
    NearStationRemoved,
};
use crate::item::{Item, ItemId};
use crate::recipe::{CraftStation, Recipe};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use void_event::EventBus;

/// Owns a job queue against one or more shared containers
pub struct Crafter {
    database: Arc<Database>,
    containers: Vec<ContainerRef>,
    jobs: Vec<CraftingJob>,
    near_stations: Vec<Arc<CraftStation>>,
    config: CrafterConfig,
    events: EventBus,
}

impl Crafter {
    /// Create a crafter drawing from and depositing into `containers`, in order.
    /// A handle listed more than once is linked once.
    pub fn new(database: Arc<Database>, containers: Vec<ContainerRef>, config: CrafterConfig) -> Self {
        let mut crafter = Self {
            database,
            containers: Vec::with_capacity(containers.len()),
            jobs: Vec::new(),
            near_stations: Vec::new(),
            config,
            events: EventBus::new(),
        };
        for container in containers {
            if !crafter.add_container(container) {
                log::warn!("Container linked twice to a crafter; ignoring the repeat");
            }
        }
        crafter
    }

    /// Link another container. Returns false if it is already linked.
    pub fn add_container(&mut self, container: ContainerRef) -> bool {
        if self.containers.iter().any(|c| Arc::ptr_eq(c, &container)) {
            return false;
        }
        self.containers.push(container);
        true
    }

    /// Linked containers
    pub fn containers(&self) -> &[ContainerRef] {
        &self.containers
    }

    /// Catalog
    pub fn database(&self) -> &Arc<Database> {
        &self.database
    }

    /// Recipes this crafter can attempt
    pub fn recipes(&self) -> &[Arc<Recipe>] {
        self.database.recipes()
    }

    /// Configuration
    pub fn config(&self) -> &CrafterConfig {
        &self.config
    }

    /// Enable or disable finishing jobs whose time has passed
    pub fn set_can_finish_craft(&mut self, can_finish_craft: bool) {
        self.config.can_finish_craft = can_finish_craft;
    }

    /// Subscribe / unsubscribe to this crafter's notifications
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Notification bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ---- jobs ----

    /// Check if anything is being crafted
    pub fn is_crafting(&self) -> bool {
        !self.jobs.is_empty()
    }

    /// Number of jobs in the queue
    pub fn count_of_craftings(&self) -> usize {
        self.jobs.len()
    }

    /// All jobs, in order
    pub fn jobs(&self) -> &[CraftingJob] {
        &self.jobs
    }

    /// Read a job
    pub fn job(&self, index: usize) -> Result<&CraftingJob> {
        self.jobs.get(index).ok_or(InventoryError::JobOutOfRange {
            index,
            len: self.jobs.len(),
        })
    }

    /// Index of a job
    pub fn index_of(&self, job: &CraftingJob) -> Option<usize> {
        self.jobs.iter().position(|j| j == job)
    }

    /// Replace a job in place. An invalid job index is a no-op returning
    /// false; a job naming an unknown recipe is an error.
    pub fn set_job(&mut self, index: usize, job: CraftingJob) -> Result<bool> {
        self.database.recipe(job.recipe_index)?;
        match self.jobs.get_mut(index) {
            Some(slot) => {
                *slot = job;
                self.events.publish(JobUpdated { index });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Append a job without consuming materials. A job naming an unknown
    /// recipe is an error.
    pub fn push_job(&mut self, job: CraftingJob) -> Result<()> {
        self.database.recipe(job.recipe_index)?;
        let recipe_index = job.recipe_index;
        self.jobs.push(job);
        self.events.publish(JobAdded {
            index: self.jobs.len() - 1,
            recipe_index,
        });
        Ok(())
    }

    /// Remove a job without refunding. An invalid index is a no-op.
    pub fn remove_job_at(&mut self, index: usize) -> Option<CraftingJob> {
        if index >= self.jobs.len() {
            return None;
        }
        let job = self.jobs.remove(index);
        self.events.publish(JobRemoved { index });
        Some(job)
    }

    // ---- crafting ----

    /// Check the job limit, required stations and materials, in that order
    pub fn can_craft(&self, recipe_index: usize) -> Result<bool> {
        let recipe = self.database.recipe(recipe_index)?;
        Ok(self.can_craft_recipe(recipe))
    }

    /// Consume materials and queue a job. Returns false when the craft was
    /// declined.
    pub fn craft(&mut self, recipe_index: usize) -> Result<bool> {
        let recipe = self.database.recipe(recipe_index)?.clone();
        if !self.can_craft_recipe(&recipe) {
            log::trace!("Declined craft of '{}'", recipe.name);
            return Ok(false);
        }
        let Some(consumed) = self.withdraw(&recipe) else {
            return Ok(false);
        };

        self.push_job(CraftingJob::new(recipe_index, recipe.time_for_craft()).with_consumed(consumed))?;
        log::debug!("Craft requested: '{}'", recipe.name);
        self.events.publish(CraftRequested { recipe_index });
        Ok(true)
    }

    /// Cancel a pending job and refund its materials. Finished jobs and
    /// invalid indices are left alone.
    pub fn cancel_craft(&mut self, index: usize) -> Result<bool> {
        let Some(job) = self.jobs.get(index) else {
            return Ok(false);
        };
        if job.is_finished() {
            return Ok(false);
        }
        let recipe_index = job.recipe_index;

        if job.consumed().is_empty() {
            let recipe = self.database.recipe(recipe_index)?.clone();
            for required in recipe.required_items() {
                self.refund_any(&required.item, required.amount);
            }
        } else {
            for withdrawal in job.consumed().to_vec() {
                self.refund(&withdrawal);
            }
        }

        self.remove_job_at(index);
        log::debug!("Craft cancelled (recipe {})", recipe_index);
        self.events.publish(CraftCancelled { recipe_index });
        Ok(true)
    }

    /// Advance every job by `delta_time` seconds and complete finished ones.
    /// Returns the number of jobs completed.
    pub fn update(&mut self, delta_time: f32) -> Result<usize> {
        let mut completed = 0;
        let mut i = 0;
        while i < self.jobs.len() {
            let job = &mut self.jobs[i];
            job.add_time_elapsed(delta_time);
            if !(job.is_finished() && self.config.can_finish_craft) {
                i += 1;
                continue;
            }

            let recipe_index = job.recipe_index;
            let recipe = self.database.recipe(recipe_index)?.clone();
            let undelivered = self.deposit(recipe.product(), recipe.amount_of_product());
            if undelivered > 0 {
                log::warn!(
                    "Containers full: {} x {} from '{}' not delivered",
                    undelivered,
                    recipe.product().name,
                    recipe.name
                );
            }
            log::debug!("Crafted '{}'", recipe.name);
            self.events.publish(Crafted {
                recipe_index,
                undelivered,
            });
            // Removal shifts later jobs down; stay on this index
            self.remove_job_at(i);
            completed += 1;
        }
        Ok(completed)
    }

    // ---- near stations ----

    /// Stations currently in range
    pub fn near_stations(&self) -> &[Arc<CraftStation>] {
        &self.near_stations
    }

    /// Check if a station is in range
    pub fn is_near(&self, station: &CraftStation) -> bool {
        self.near_stations.iter().any(|s| s.name == station.name)
    }

    /// A station came into range. Ignored when tracking is off or the station
    /// is already known.
    pub fn on_near(&mut self, station: Arc<CraftStation>) -> bool {
        if !self.config.track_near_stations || self.is_near(&station) {
            return false;
        }
        self.near_stations.push(station.clone());
        self.events.publish(NearStationAdded { station });
        true
    }

    /// A station left range
    pub fn on_leave(&mut self, station: &CraftStation) -> bool {
        if !self.config.track_near_stations {
            return false;
        }
        let Some(index) = self.near_stations.iter().position(|s| s.name == station.name) else {
            return false;
        };
        let station = self.near_stations.remove(index);
        self.events.publish(NearStationRemoved { station });
        true
    }

    // ---- internals ----

    fn can_craft_recipe(&self, recipe: &Recipe) -> bool {
        if self.config.limit_crafts && self.jobs.len() >= self.config.crafts_limit as usize {
            return false;
        }
        if !recipe.need_craft_stations().iter().all(|s| self.is_near(s)) {
            return false;
        }
        // Lines naming the same item add up
        let mut totals: BTreeMap<ItemId, (&Arc<Item>, u32)> = BTreeMap::new();
        for required in recipe.required_items() {
            totals
                .entry(required.item.id)
                .or_insert((&required.item, 0))
                .1 += u32::from(required.amount);
        }
        totals
            .values()
            .all(|(item, amount)| self.has_item(item, *amount))
    }

    fn has_item(&self, item: &Item, amount: u32) -> bool {
        let mut needed = amount;
        for container in &self.containers {
            let have = container.lock().amount_of(item);
            if have >= needed {
                return true;
            }
            needed -= have;
        }
        needed == 0
    }

    /// Take every requirement, or nothing
    fn withdraw(&self, recipe: &Recipe) -> Option<Vec<Withdrawal>> {
        let mut taken = Vec::new();
        for required in recipe.required_items() {
            let mut needed = required.amount;
            for (index, container) in self.containers.iter().enumerate() {
                if needed == 0 {
                    break;
                }
                let shortfall = container.lock().remove_item(&required.item, needed);
                if shortfall < needed {
                    taken.push(Withdrawal {
                        container: index,
                        item: required.item.clone(),
                        amount: needed - shortfall,
                    });
                }
                needed = shortfall;
            }

            if needed > 0 {
                log::warn!(
                    "Could not withdraw {} x {} for '{}', rolling back",
                    needed,
                    required.item.name,
                    recipe.name
                );
                for withdrawal in taken.iter().rev() {
                    self.refund(withdrawal);
                }
                return None;
            }
        }
        Some(taken)
    }

    fn refund(&self, withdrawal: &Withdrawal) {
        let leftover = match self.containers.get(withdrawal.container) {
            Some(container) => container
                .lock()
                .add_item(&withdrawal.item, withdrawal.amount),
            None => withdrawal.amount,
        };
        if leftover > 0 {
            self.refund_any(&withdrawal.item, leftover);
        }
    }

    fn refund_any(&self, item: &Arc<Item>, amount: u16) {
        let leftover = self.deposit(item, amount);
        if leftover > 0 {
            log::warn!("Refund of {} x {} did not fit", leftover, item.name);
        }
    }

    /// Add to containers in order, returning what none accepted
    fn deposit(&self, item: &Arc<Item>, amount: u16) -> u16 {
        let mut leftover = amount;
        for container in &self.containers {
            if leftover == 0 {
                break;
            }
            leftover = container.lock().add_item(item, leftover);
        }
        leftover
    }
}

impl fmt::Debug for Crafter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crafter")
            .field("containers", &self.containers.len())
            .field("jobs", &self.jobs)
            .field("near_stations", &self.near_stations)
            .field("config", &self.config)
            .finish()
    }
}
