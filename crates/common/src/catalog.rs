//! Menu catalog
//!
//! The catalog is loaded once per session and never mutated afterwards.
//! Each item carries an English and a Chinese display name; the cart,
//! the preview and all sorting use the English name.

use crate::money::Amount;
use crate::types::{ItemId, Language};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A purchasable menu item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ItemId,
    pub english_name: String,
    pub localized_name: String,
    pub unit_price: Amount,
}

impl MenuItem {
    pub fn new(id: &str, english_name: &str, localized_name: &str, unit_price: Amount) -> Self {
        Self {
            id: ItemId::from(id),
            english_name: english_name.to_string(),
            localized_name: localized_name.to_string(),
            unit_price,
        }
    }

    /// Display name in the given name table
    pub fn name(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english_name,
            Language::Chinese => &self.localized_name,
        }
    }
}

static COFFEE_MENU: Lazy<Vec<MenuItem>> = Lazy::new(|| {
    [
        ("espresso", "Espresso", "特浓咖啡", 1000),
        ("espresso-macchiato", "Espresso Macchiato", "浓缩玛奇朵", 1200),
        ("cappuccino", "Cappuccino", "卡布奇诺", 1900),
        ("mocha", "Mocha", "摩卡", 800),
        ("flat-white", "Flat White", "平白咖啡", 1800),
        ("americano", "Americano", "美式咖啡", 700),
        ("cafe-latte", "Cafe Latte", "拿铁", 1600),
        ("espresso-con-panna", "Espresso Con Panna", "浓缩康宝蓝", 1400),
        ("cafe-breve", "Cafe Breve", "半拿铁", 1500),
    ]
    .into_iter()
    .map(|(id, english, chinese, cents)| {
        MenuItem::new(id, english, chinese, Amount::from_cents(cents))
    })
    .collect()
});

/// Immutable, ordered list of menu items
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuCatalog {
    items: Vec<MenuItem>,
}

impl MenuCatalog {
    /// Build a catalog, rejecting duplicate ids and blank names
    pub fn new(items: Vec<MenuItem>) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::InvalidConfig("catalog has no items".to_string()));
        }

        let mut seen = HashSet::new();
        for item in &items {
            if item.id.as_str().trim().is_empty() {
                return Err(Error::InvalidConfig("catalog item with empty id".to_string()));
            }
            if item.english_name.trim().is_empty() || item.localized_name.trim().is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "catalog item {} is missing a display name",
                    item.id
                )));
            }
            if !seen.insert(item.id.clone()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate catalog item {}",
                    item.id
                )));
            }
        }

        Ok(Self { items })
    }

    /// The nine-coffee menu served by the storefront
    pub fn coffee_menu() -> Self {
        Self {
            items: COFFEE_MENU.clone(),
        }
    }

    pub fn get(&self, id: &ItemId) -> Result<&MenuItem> {
        self.items
            .iter()
            .find(|item| &item.id == id)
            .ok_or_else(|| Error::UnknownItem(id.clone()))
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// Items in menu order
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for MenuCatalog {
    fn default() -> Self {
        Self::coffee_menu()
    }
}
