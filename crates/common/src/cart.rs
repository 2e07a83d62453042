//! Cart store
//!
//! Holds ordinary lines created by item activation and discounted lines
//! injected by the promotion engine, in insertion order. A line exists only
//! while its quantity is at least one.

use crate::catalog::MenuCatalog;
use crate::money::Amount;
use crate::types::{EntryId, ItemId};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ordinary cart line priced at the catalog unit price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub item_id: ItemId,
    pub quantity: u32,
}

/// Cart line granted by a promotion at a fixed price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountEntry {
    pub source_item_id: ItemId,
    pub fixed_price: Amount,
    pub quantity: u32,
}

/// One line of the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartLine {
    Ordinary(CartEntry),
    Discounted(DiscountEntry),
}

impl CartLine {
    pub fn id(&self) -> EntryId {
        match self {
            CartLine::Ordinary(entry) => EntryId::Ordinary(entry.item_id.clone()),
            CartLine::Discounted(entry) => EntryId::Discounted(entry.source_item_id.clone()),
        }
    }

    pub fn quantity(&self) -> u32 {
        match self {
            CartLine::Ordinary(entry) => entry.quantity,
            CartLine::Discounted(entry) => entry.quantity,
        }
    }

    fn quantity_mut(&mut self) -> &mut u32 {
        match self {
            CartLine::Ordinary(entry) => &mut entry.quantity,
            CartLine::Discounted(entry) => &mut entry.quantity,
        }
    }

    fn matches(&self, id: &EntryId) -> bool {
        match (self, id) {
            (CartLine::Ordinary(entry), EntryId::Ordinary(item)) => &entry.item_id == item,
            (CartLine::Discounted(entry), EntryId::Discounted(item)) => {
                &entry.source_item_id == item
            }
            _ => false,
        }
    }
}

/// Mutable cart state for one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartStore {
    lines: Vec<CartLine>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a menu item, creating its line on first activation
    ///
    /// Returns the line's new quantity.
    pub fn activate(&mut self, catalog: &MenuCatalog, item_id: &ItemId) -> Result<u32> {
        if !catalog.contains(item_id) {
            return Err(Error::UnknownItem(item_id.clone()));
        }

        let id = EntryId::Ordinary(item_id.clone());
        let quantity = match self.position(&id) {
            Some(index) => {
                let quantity = self.lines[index].quantity_mut();
                *quantity += 1;
                *quantity
            }
            None => {
                self.lines.push(CartLine::Ordinary(CartEntry {
                    item_id: item_id.clone(),
                    quantity: 1,
                }));
                1
            }
        };

        debug!("Activated {} (quantity {})", item_id, quantity);
        Ok(quantity)
    }

    /// Add one unit to an existing ordinary line
    ///
    /// Discounted lines have no increment control.
    pub fn increment(&mut self, id: &EntryId) -> Result<u32> {
        if id.is_discounted() {
            return Err(Error::not_available(format!("increment control for {}", id)));
        }

        let index = self
            .position(id)
            .ok_or_else(|| Error::EntryNotFound(id.clone()))?;
        let quantity = self.lines[index].quantity_mut();
        *quantity += 1;

        debug!("Incremented {} (quantity {})", id, *quantity);
        Ok(*quantity)
    }

    /// Remove one unit from a line, dropping the line at zero
    ///
    /// Returns the remaining quantity, or `None` when the line was removed.
    pub fn decrement(&mut self, id: &EntryId) -> Result<Option<u32>> {
        let index = self
            .position(id)
            .ok_or_else(|| Error::EntryNotFound(id.clone()))?;

        let quantity = self.lines[index].quantity_mut();
        assert!(*quantity >= 1, "cart line {} has zero quantity", id);
        *quantity -= 1;

        if *quantity == 0 {
            self.lines.remove(index);
            debug!("Decremented {} to zero, line removed", id);
            Ok(None)
        } else {
            debug!("Decremented {} (quantity {})", id, *quantity);
            Ok(Some(*quantity))
        }
    }

    /// Delete a line regardless of its quantity
    pub fn remove_entry(&mut self, id: &EntryId) -> Result<()> {
        let index = self
            .position(id)
            .ok_or_else(|| Error::EntryNotFound(id.clone()))?;
        self.lines.remove(index);

        debug!("Removed {}", id);
        Ok(())
    }

    /// Add one discounted unit, merging into an existing discounted line
    pub(crate) fn add_discount(&mut self, source_item_id: &ItemId, fixed_price: Amount) -> u32 {
        let id = EntryId::Discounted(source_item_id.clone());
        match self.position(&id) {
            Some(index) => {
                let quantity = self.lines[index].quantity_mut();
                *quantity += 1;
                *quantity
            }
            None => {
                self.lines.push(CartLine::Discounted(DiscountEntry {
                    source_item_id: source_item_id.clone(),
                    fixed_price,
                    quantity: 1,
                }));
                1
            }
        }
    }

    /// Snapshot of the current lines in insertion order
    pub fn entries(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    pub fn get(&self, id: &EntryId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.matches(id))
    }

    /// Total number of units across every line
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(CartLine::quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn reset(&mut self) {
        self.lines.clear();
    }

    fn position(&self, id: &EntryId) -> Option<usize> {
        self.lines.iter().position(|line| line.matches(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn espresso() -> ItemId {
        ItemId::from("espresso")
    }

    #[test]
    fn test_activate_creates_then_increments() {
        let catalog = MenuCatalog::default();
        let mut cart = CartStore::new();

        for expected in 1..=10 {
            assert_eq!(cart.activate(&catalog, &espresso()).unwrap(), expected);
        }
        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.item_count(), 10);
    }

    #[test]
    fn test_activate_unknown_item() {
        let catalog = MenuCatalog::default();
        let mut cart = CartStore::new();

        let err = cart.activate(&catalog, &ItemId::from("tea")).unwrap_err();
        assert!(matches!(err, Error::UnknownItem(_)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrement_to_zero_equals_remove() {
        let catalog = MenuCatalog::default();
        let id = EntryId::Ordinary(espresso());

        let mut by_decrement = CartStore::new();
        let mut by_remove = CartStore::new();
        for _ in 0..3 {
            by_decrement.activate(&catalog, &espresso()).unwrap();
            by_remove.activate(&catalog, &espresso()).unwrap();
        }
        by_remove.activate(&catalog, &ItemId::from("mocha")).unwrap();
        by_decrement.activate(&catalog, &ItemId::from("mocha")).unwrap();

        assert_eq!(by_decrement.decrement(&id).unwrap(), Some(2));
        assert_eq!(by_decrement.decrement(&id).unwrap(), Some(1));
        assert_eq!(by_decrement.decrement(&id).unwrap(), None);
        by_remove.remove_entry(&id).unwrap();

        assert_eq!(by_decrement, by_remove);
        assert!(by_decrement.get(&id).is_none());
    }

    #[test]
    fn test_missing_entry() {
        let mut cart = CartStore::new();
        let id = EntryId::Ordinary(espresso());

        assert!(matches!(cart.decrement(&id), Err(Error::EntryNotFound(_))));
        assert!(matches!(cart.increment(&id), Err(Error::EntryNotFound(_))));
        assert!(matches!(cart.remove_entry(&id), Err(Error::EntryNotFound(_))));
    }

    #[test]
    fn test_discount_lines_cannot_be_incremented() {
        let mut cart = CartStore::new();
        let mocha = ItemId::from("mocha");
        cart.add_discount(&mocha, Amount::from_cents(400));

        let id = EntryId::Discounted(mocha.clone());
        assert!(matches!(cart.increment(&id), Err(Error::NotAvailable(_))));
        assert_eq!(cart.get(&id).unwrap().quantity(), 1);

        assert_eq!(cart.add_discount(&mocha, Amount::from_cents(400)), 2);
        assert_eq!(cart.decrement(&id).unwrap(), Some(1));
        assert_eq!(cart.decrement(&id).unwrap(), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_entries_is_a_snapshot() {
        let catalog = MenuCatalog::default();
        let mut cart = CartStore::new();
        cart.activate(&catalog, &espresso()).unwrap();

        let snapshot = cart.entries();
        cart.activate(&catalog, &espresso()).unwrap();

        assert_eq!(snapshot[0].quantity(), 1);
        assert_eq!(cart.entries()[0].quantity(), 2);
    }
}
