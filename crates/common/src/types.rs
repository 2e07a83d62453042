//! Core types for Coffee Cart

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a menu item, e.g. `espresso` or `flat-white`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const DISCOUNTED_PREFIX: &str = "discounted:";

/// Identifier of a cart line
///
/// Ordinary lines are keyed by the catalog item they were activated from.
/// Discounted lines are keyed by the item the promotion granted. The textual
/// form is `espresso` for ordinary lines and `discounted:mocha` for
/// discounted ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EntryId {
    Ordinary(ItemId),
    Discounted(ItemId),
}

impl EntryId {
    pub fn item(&self) -> &ItemId {
        match self {
            EntryId::Ordinary(item) | EntryId::Discounted(item) => item,
        }
    }

    pub fn is_discounted(&self) -> bool {
        matches!(self, EntryId::Discounted(_))
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Ordinary(item) => write!(f, "{}", item),
            EntryId::Discounted(item) => write!(f, "{}{}", DISCOUNTED_PREFIX, item),
        }
    }
}

impl FromStr for EntryId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (discounted, item) = match s.strip_prefix(DISCOUNTED_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        if item.is_empty() || item.contains(char::is_whitespace) {
            return Err(Error::InvalidEntryId(s.to_string()));
        }

        let item = ItemId::from(item);
        Ok(if discounted {
            EntryId::Discounted(item)
        } else {
            EntryId::Ordinary(item)
        })
    }
}

impl TryFrom<String> for EntryId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.to_string()
    }
}

/// Name table a menu card is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    Chinese,
}

impl Default for Language {
    fn default() -> Self {
        Self::English
    }
}

impl Language {
    pub fn toggled(self) -> Self {
        match self {
            Language::English => Language::Chinese,
            Language::Chinese => Language::English,
        }
    }
}

/// Storefront page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Menu,
    Cart,
    Github,
}

impl Default for Route {
    fn default() -> Self {
        Self::Menu
    }
}

impl Route {
    /// Every route in navigation bar order
    pub const ALL: [Route; 3] = [Route::Menu, Route::Cart, Route::Github];

    pub fn path(self) -> &'static str {
        match self {
            Route::Menu => "/",
            Route::Cart => "/cart",
            Route::Github => "/github",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Menu => write!(f, "menu"),
            Route::Cart => write!(f, "cart"),
            Route::Github => write!(f, "github"),
        }
    }
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "menu" | "/" => Ok(Route::Menu),
            "cart" | "/cart" => Ok(Route::Cart),
            "github" | "/github" => Ok(Route::Github),
            other => Err(Error::UnknownRoute(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_text_form() {
        let ordinary: EntryId = "espresso".parse().unwrap();
        let discounted: EntryId = "discounted:mocha".parse().unwrap();

        assert_eq!(ordinary, EntryId::Ordinary(ItemId::from("espresso")));
        assert_eq!(discounted, EntryId::Discounted(ItemId::from("mocha")));
        assert_eq!(discounted.to_string(), "discounted:mocha");
        assert!(discounted.is_discounted());
    }

    #[test]
    fn test_entry_id_rejects_empty() {
        assert!(matches!(
            "discounted:".parse::<EntryId>(),
            Err(Error::InvalidEntryId(_))
        ));
        assert!("".parse::<EntryId>().is_err());
    }

    #[test]
    fn test_entry_id_serde_uses_text_form() {
        let id = EntryId::Discounted(ItemId::from("mocha"));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"discounted:mocha\"");

        let back: EntryId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_route_parsing() {
        assert_eq!("/cart".parse::<Route>().unwrap(), Route::Cart);
        assert_eq!("github".parse::<Route>().unwrap(), Route::Github);
        assert!(matches!("/admin".parse::<Route>(), Err(Error::UnknownRoute(_))));
    }
}
