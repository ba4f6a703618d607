//! Item transfer between two containers, or within one
//!
//! Each operation is a compensating sequence: whatever the destination
//! refuses goes back to the source, and only what neither side can hold is
//! reported as lost so the caller can drop it into the world.

use crate::container::Container;
use crate::error::Result;
use crate::item::Item;
use std::sync::Arc;

/// The two sides of a transfer
pub enum Endpoints<'a> {
    /// Distinct containers
    Split {
        from: &'a mut Container,
        to: &'a mut Container,
    },
    /// Source and destination are the same container
    Same(&'a mut Container),
}

impl<'a> Endpoints<'a> {
    /// Source container
    pub fn source(&mut self) -> &mut Container {
        match self {
            Endpoints::Split { from, .. } => &mut **from,
            Endpoints::Same(container) => &mut **container,
        }
    }

    /// Destination container
    pub fn target(&mut self) -> &mut Container {
        match self {
            Endpoints::Split { to, .. } => &mut **to,
            Endpoints::Same(container) => &mut **container,
        }
    }

    /// Check if both sides are one container
    pub fn is_same(&self) -> bool {
        matches!(self, Endpoints::Same(_))
    }
}

/// Quantities accounted for by one transfer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferOutcome {
    /// Item that was transferred (`None` if the source slot was empty)
    pub item: Option<Arc<Item>>,
    /// Quantity that reached the destination
    pub moved: u16,
    /// Quantity the destination refused and the source took back
    pub restored: u16,
    /// Quantity neither side could hold
    pub lost: u16,
}

impl TransferOutcome {
    /// Check if anything left the source slot
    pub fn is_noop(&self) -> bool {
        self.moved == 0 && self.lost == 0
    }
}

/// Move up to `amount` from `source[index]` into the destination.
///
/// Fails only when `index` is out of range for the source.
pub fn move_items(ends: &mut Endpoints<'_>, index: usize, amount: u16) -> Result<TransferOutcome> {
    let Some(item) = ends.source().slot(index)?.item().cloned() else {
        return Ok(TransferOutcome::default());
    };

    let removed = amount - ends.source().remove_item_at(index, amount);
    let refused = ends.target().add_item(&item, removed);
    let lost = ends.source().add_item_at(&item, index, refused);

    log::trace!(
        "Moved {} x {} (restored {}, lost {})",
        removed - refused,
        item.name,
        refused - lost,
        lost
    );
    Ok(TransferOutcome {
        item: Some(item),
        moved: removed - refused,
        restored: refused - lost,
        lost,
    })
}

/// Exchange the full contents of `source[index]` and `target[other_index]`.
///
/// Both indices are read first; either being out of range is an error and
/// nothing changes.
pub fn swap_slots(ends: &mut Endpoints<'_>, index: usize, other_index: usize) -> Result<()> {
    if let Endpoints::Same(container) = ends {
        return container.swap_slots(index, other_index);
    }

    let slot = ends.source().slot(index)?.clone();
    let other = ends.target().slot(other_index)?.clone();
    ends.source().set(index, other);
    ends.target().set(other_index, slot);
    Ok(())
}

/// Partial swap.
///
/// When the destination slot is empty or holds the same item, moves up to
/// `amount` into it, limited by its remaining capacity. When it holds a
/// different item, the two slots are swapped only if `amount` is the source
/// slot's whole quantity.
pub fn trade(
    ends: &mut Endpoints<'_>,
    index: usize,
    other_index: usize,
    amount: u16,
) -> Result<TransferOutcome> {
    let slot = ends.source().slot(index)?.clone();
    let other = ends.target().slot(other_index)?.clone();
    let Some(item) = slot.item().cloned() else {
        return Ok(TransferOutcome::default());
    };
    if ends.is_same() && index == other_index {
        return Ok(TransferOutcome::default());
    }

    if !other.is_empty() && !other.holds(&item) {
        if slot.amount() != amount {
            return Ok(TransferOutcome::default());
        }
        swap_slots(ends, index, other_index)?;
        return Ok(TransferOutcome {
            item: Some(item),
            moved: amount,
            ..Default::default()
        });
    }

    let capacity = if other.is_empty() {
        item.max_stack()
    } else {
        other.remaining()
    };
    let for_trade = amount.min(capacity);

    let len_before = ends.source().len();
    let removed = for_trade - ends.source().remove_item_at(index, for_trade);
    let mut target_index = other_index;
    // A pruned source slot shifts later slots of the same container down
    if ends.is_same() && ends.source().len() < len_before && other_index > index {
        target_index -= 1;
    }

    let refused = ends.target().add_item_at(&item, target_index, removed);
    let lost = ends.source().add_item_at(&item, index, refused);
    Ok(TransferOutcome {
        item: Some(item),
        moved: removed - refused,
        restored: refused - lost,
        lost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InventoryError;
    use crate::slot::Slot;

    fn items() -> (Arc<Item>, Arc<Item>) {
        (
            Arc::new(Item::new(1, "Stone").with_max_stack(10)),
            Arc::new(Item::new(2, "Torch").with_max_stack(10)),
        )
    }

    #[test]
    fn test_move_all() {
        let (stone, _) = items();
        let mut from = Container::new();
        let mut to = Container::new();
        from.add_item(&stone, 6);

        let outcome = move_items(&mut Endpoints::Split { from: &mut from, to: &mut to }, 0, 4).unwrap();
        assert_eq!(outcome.moved, 4);
        assert_eq!(outcome.lost, 0);
        assert_eq!(from.amount_of(&stone), 2);
        assert_eq!(to.amount_of(&stone), 4);
    }

    #[test]
    fn test_move_restores_refused() {
        let (stone, torch) = items();
        let mut from = Container::new();
        let mut to = Container::with_limit(1);
        from.add_item(&stone, 8);
        to.add_item(&torch, 1);

        let outcome = move_items(&mut Endpoints::Split { from: &mut from, to: &mut to }, 0, 8).unwrap();
        assert_eq!(outcome.moved, 0);
        assert_eq!(outcome.restored, 8);
        assert_eq!(outcome.lost, 0);
        assert_eq!(from.amount_of(&stone), 8);
        assert_eq!(from.len(), 1);
    }

    #[test]
    fn test_move_bad_index() {
        let mut from = Container::new();
        let mut to = Container::new();
        let result = move_items(&mut Endpoints::Split { from: &mut from, to: &mut to }, 3, 1);
        assert!(matches!(result, Err(InventoryError::SlotOutOfRange { index: 3, .. })));
    }

    #[test]
    fn test_swap_between() {
        let (stone, torch) = items();
        let mut a = Container::fixed(2);
        let mut b = Container::fixed(2);
        a.add_item(&stone, 3);
        b.add_item_at(&torch, 1, 5);

        swap_slots(&mut Endpoints::Split { from: &mut a, to: &mut b }, 0, 1).unwrap();
        assert_eq!(a[0].item_id(), torch.id);
        assert_eq!(a[0].amount(), 5);
        assert_eq!(b[1].item_id(), stone.id);
        assert!(b[0].is_empty());
    }

    #[test]
    fn test_swap_reads_first() {
        let (stone, _) = items();
        let mut a = Container::new();
        let mut b = Container::new();
        a.add_item(&stone, 3);

        assert!(swap_slots(&mut Endpoints::Split { from: &mut a, to: &mut b }, 0, 0).is_err());
        assert_eq!(a.amount_of(&stone), 3);
    }

    #[test]
    fn test_trade_limited_by_capacity() {
        let (stone, _) = items();
        let mut a = Container::fixed(2);
        let mut b = Container::fixed(2);
        a.add_item(&stone, 6);
        b.add_item(&stone, 7);

        let outcome = trade(&mut Endpoints::Split { from: &mut a, to: &mut b }, 0, 0, 6).unwrap();
        assert_eq!(outcome.moved, 3);
        assert_eq!(a[0].amount(), 3);
        assert_eq!(b[0].amount(), 10);
    }

    #[test]
    fn test_trade_heterogeneous_needs_full_amount() {
        let (stone, torch) = items();
        let mut a = Container::fixed(1);
        let mut b = Container::fixed(1);
        a.add_item(&stone, 4);
        b.add_item(&torch, 2);

        let outcome = trade(&mut Endpoints::Split { from: &mut a, to: &mut b }, 0, 0, 3).unwrap();
        assert!(outcome.is_noop());
        assert_eq!(a[0].item_id(), stone.id);

        trade(&mut Endpoints::Split { from: &mut a, to: &mut b }, 0, 0, 4).unwrap();
        assert_eq!(a[0].item_id(), torch.id);
        assert_eq!(b[0].amount(), 4);
    }

    #[test]
    fn test_trade_within_one_container() {
        let (stone, torch) = items();
        let mut container = Container::new();
        container.add_item(&stone, 2);
        container.push(Slot::new(torch.clone(), 1));
        container.push(Slot::new(stone.clone(), 5));

        let outcome = trade(&mut Endpoints::Same(&mut container), 0, 2, 2).unwrap();
        assert_eq!(outcome.moved, 2);
        // Slot 0 was emptied and pruned
        assert_eq!(container.len(), 2);
        assert_eq!(container[1].amount(), 7);
        assert_eq!(container.amount_of(&stone), 7);
    }
}
