//! Pricing calculator
//!
//! Pure functions of the current cart lines. Nothing here mutates state,
//! so computing a total twice over the same cart yields identical amounts.

use crate::cart::CartLine;
use crate::catalog::MenuCatalog;
use crate::money::Amount;
use crate::types::{EntryId, Language};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Prefix shown before the name of a discounted line
pub const DISCOUNTED_LABEL: &str = "(Discounted)";

/// A cart line with its display name and prices resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineView {
    pub id: EntryId,
    pub name: String,
    /// Catalog unit price, or the fixed price for discounted lines
    pub unit_price: Amount,
    pub quantity: u32,
    pub line_total: Amount,
    pub discounted: bool,
}

impl LineView {
    /// Unit description as the cart shows it, e.g. `$10.00 x 2`
    pub fn unit_desc(&self) -> String {
        format!("{} x {}", self.unit_price, self.quantity)
    }
}

/// Price of a single unit on this line
pub fn unit_price(line: &CartLine, catalog: &MenuCatalog) -> Result<Amount> {
    match line {
        CartLine::Ordinary(entry) => Ok(catalog.get(&entry.item_id)?.unit_price),
        CartLine::Discounted(entry) => Ok(entry.fixed_price),
    }
}

pub fn line_total(line: &CartLine, catalog: &MenuCatalog) -> Result<Amount> {
    Ok(unit_price(line, catalog)?.times(line.quantity()))
}

/// English display name of a line
pub fn display_name(line: &CartLine, catalog: &MenuCatalog) -> Result<String> {
    match line {
        CartLine::Ordinary(entry) => Ok(catalog
            .get(&entry.item_id)?
            .name(Language::English)
            .to_string()),
        CartLine::Discounted(entry) => Ok(format!(
            "{} {}",
            DISCOUNTED_LABEL,
            catalog.get(&entry.source_item_id)?.name(Language::English)
        )),
    }
}

/// Resolve every line for display, preserving cart order
pub fn lines(entries: &[CartLine], catalog: &MenuCatalog) -> Result<Vec<LineView>> {
    entries
        .iter()
        .map(|line| {
            let unit_price = unit_price(line, catalog)?;
            Ok(LineView {
                id: line.id(),
                name: display_name(line, catalog)?,
                unit_price,
                quantity: line.quantity(),
                line_total: unit_price.times(line.quantity()),
                discounted: matches!(line, CartLine::Discounted(_)),
            })
        })
        .collect()
}

/// Aggregate total of ordinary and discounted lines
pub fn total(entries: &[CartLine], catalog: &MenuCatalog) -> Result<Amount> {
    let mut sum = Amount::ZERO;
    for line in entries {
        sum = sum + line_total(line, catalog)?;
    }

    assert!(!sum.is_negative(), "cart total went negative: {}", sum);
    Ok(sum)
}

/// Pay button caption, e.g. `Total: $3.00`
pub fn total_label(amount: Amount) -> String {
    format!("Total: {}", amount)
}
