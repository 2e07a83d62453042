//! Navigation bar

use crate::types::Route;
use serde::{Deserialize, Serialize};

/// Message on the cart page when nothing has been ordered
pub const EMPTY_CART_MESSAGE: &str = "No coffee, go add some.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub route: Route,
    pub path: String,
    /// Set on the link of the page being shown
    pub active: bool,
}

/// The three navigation links, `menu`, `cart (N)` and `github`
pub fn links(current: Route, cart_count: u32) -> Vec<NavLink> {
    Route::ALL
        .iter()
        .map(|&route| NavLink {
            label: match route {
                Route::Cart => format!("cart ({})", cart_count),
                other => other.to_string(),
            },
            route,
            path: route.path().to_string(),
            active: route == current,
        })
        .collect()
}
