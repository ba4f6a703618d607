//! Hot bar selection over a container

use crate::container::ContainerRef;
use crate::events::SelectionChanged;
use crate::item::Item;
use std::sync::Arc;
use void_event::EventBus;

/// Selected slot index into a shared container
pub struct HotBar {
    container: ContainerRef,
    selection_index: usize,
    events: EventBus,
}

impl HotBar {
    /// Create a hot bar selecting the first slot
    pub fn new(container: ContainerRef) -> Self {
        Self {
            container,
            selection_index: 0,
            events: EventBus::new(),
        }
    }

    /// Container the selection points into
    pub fn container(&self) -> &ContainerRef {
        &self.container
    }

    /// Selected slot index
    pub fn selection_index(&self) -> usize {
        self.selection_index
    }

    /// Subscribe / unsubscribe to selection changes
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Select `index`. Out of range is ignored.
    pub fn change_selection(&mut self, index: usize) -> bool {
        let slot = {
            let container = self.container.lock();
            match container.slot(index) {
                Ok(slot) => slot.clone(),
                Err(_) => return false,
            }
        };
        self.selection_index = index;
        log::trace!("Hot bar selection -> {}", index);
        self.events.publish(SelectionChanged {
            index,
            slot: Some(slot),
        });
        true
    }

    /// Select the next slot, wrapping to the first
    pub fn scroll_up(&mut self) -> bool {
        let len = self.container.lock().len();
        if len == 0 {
            return false;
        }
        let next = if self.selection_index + 1 >= len {
            0
        } else {
            self.selection_index + 1
        };
        self.change_selection(next)
    }

    /// Select the previous slot, wrapping to the last
    pub fn scroll_down(&mut self) -> bool {
        let len = self.container.lock().len();
        if len == 0 {
            return false;
        }
        let next = match self.selection_index.checked_sub(1) {
            Some(index) if index < len => index,
            _ => len - 1,
        };
        self.change_selection(next)
    }

    /// Check if the selection points at an existing slot
    pub fn is_an_item_selected(&self) -> bool {
        self.selection_index < self.container.lock().len()
    }

    /// Item in the selected slot
    pub fn selected_item(&self) -> Option<Arc<Item>> {
        self.container
            .lock()
            .slot(self.selection_index)
            .ok()
            .and_then(|slot| slot.item().cloned())
    }
}

impl std::fmt::Debug for HotBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotBar")
            .field("selection_index", &self.selection_index)
            .finish()
    }
}
