//! Error types for Coffee Cart

use crate::types::{EntryId, ItemId};
use thiserror::Error;

/// Result type alias using Coffee Cart Error
pub type Result<T> = std::result::Result<T, Error>;

/// Coffee Cart error types
///
/// Every variant is a recoverable condition reported back to the caller; a
/// rejected command never leaves the storefront partially mutated.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown menu item: {0}")]
    UnknownItem(ItemId),

    #[error("Cart entry not found: {0}")]
    EntryNotFound(EntryId),

    #[error("No promotion offer is pending")]
    NoPendingOffer,

    #[error("Checkout validation failed (missing name: {missing_name}, invalid email: {invalid_email})")]
    ValidationFailed {
        missing_name: bool,
        invalid_email: bool,
    },

    #[error("Not available: {0}")]
    NotAvailable(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("Invalid entry id: {0}")]
    InvalidEntryId(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnknownItem(_) => "unknown_item",
            Error::EntryNotFound(_) => "entry_not_found",
            Error::NoPendingOffer => "no_pending_offer",
            Error::ValidationFailed { .. } => "validation_failed",
            Error::NotAvailable(_) => "not_available",
            Error::InvalidAmount(_) => "invalid_amount",
            Error::UnknownRoute(_) => "unknown_route",
            Error::InvalidEntryId(_) => "invalid_entry_id",
            Error::InvalidConfig(_) => "invalid_config",
            Error::Io(_) => "io",
            Error::Serialization(_) => "serialization",
            Error::Internal(_) => "internal",
        }
    }

    pub(crate) fn not_available(what: impl Into<String>) -> Self {
        Error::NotAvailable(what.into())
    }
}
