//! Cart preview shown while the checkout control is focused

use crate::money::Amount;
use crate::pricing::LineView;
use crate::types::EntryId;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Unit controls a preview entry exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewControls {
    pub increment: bool,
    pub decrement: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewEntry {
    pub id: EntryId,
    pub name: String,
    pub unit_price: Amount,
    pub quantity: u32,
    pub controls: PreviewControls,
}

/// Sorted, read-only projection of the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartPreview {
    entries: Vec<PreviewEntry>,
}

impl CartPreview {
    /// Materialize the preview
    ///
    /// Only exists while `focused` holds and the cart has at least one line;
    /// otherwise `NotAvailable`. An empty preview is never produced.
    pub fn materialize(focused: bool, lines: &[LineView]) -> Result<Self> {
        if !focused {
            return Err(Error::not_available("cart preview (checkout not focused)"));
        }
        if lines.is_empty() {
            return Err(Error::not_available("cart preview (cart is empty)"));
        }

        let mut entries: Vec<PreviewEntry> = lines
            .iter()
            .map(|line| PreviewEntry {
                id: line.id.clone(),
                name: line.name.clone(),
                unit_price: line.unit_price,
                quantity: line.quantity,
                controls: PreviewControls {
                    increment: !line.discounted,
                    decrement: true,
                },
            })
            .collect();

        // Ordinal comparison on the name; the id makes the order total.
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PreviewEntry] {
        &self.entries
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}
