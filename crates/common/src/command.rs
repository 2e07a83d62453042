//! Inbound storefront commands
//!
//! One variant per UI event the storefront accepts. Commands are applied
//! one at a time; each either applies completely or fails without any
//! change.

use crate::checkout::Confirmation;
use crate::types::{EntryId, ItemId, Route};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Click a menu cup
    Activate { item: ItemId },

    /// "+" on a cart or preview line
    Increment { entry: EntryId },

    /// "-" on a cart or preview line
    Decrement { entry: EntryId },

    /// Delete a cart line entirely
    Remove { entry: EntryId },

    AcceptPromotion,

    DiscardPromotion,

    /// Pointer enters the pay button
    FocusCheckout,

    /// Pointer leaves the pay button
    BlurCheckout,

    /// Click the pay button
    OpenCheckout,

    CloseCheckout,

    SubmitCheckout {
        #[serde(default)]
        name: String,
        #[serde(default)]
        email: String,
        #[serde(default)]
        promotional_emails: bool,
    },

    Navigate { route: Route },

    /// Double-click a menu header to switch its name table
    ToggleLanguage { item: ItemId },
}

impl Command {
    /// Short name used in logs and reports
    pub fn name(&self) -> &'static str {
        match self {
            Command::Activate { .. } => "activate",
            Command::Increment { .. } => "increment",
            Command::Decrement { .. } => "decrement",
            Command::Remove { .. } => "remove",
            Command::AcceptPromotion => "accept_promotion",
            Command::DiscardPromotion => "discard_promotion",
            Command::FocusCheckout => "focus_checkout",
            Command::BlurCheckout => "blur_checkout",
            Command::OpenCheckout => "open_checkout",
            Command::CloseCheckout => "close_checkout",
            Command::SubmitCheckout { .. } => "submit_checkout",
            Command::Navigate { .. } => "navigate",
            Command::ToggleLanguage { .. } => "toggle_language",
        }
    }
}

/// What applying a command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// A purchase went through; the caller arms the expiry timer
    Confirmed(Confirmation),
}
