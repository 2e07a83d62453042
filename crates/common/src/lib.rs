//! Coffee Cart Common Library
//!
//! The cart and promotion domain model behind the Coffee Cart storefront:
//! menu catalog, cart store, loyalty promotion, pricing, the hover preview
//! and checkout validation, tied together by a session-scoped
//! [`Storefront`].

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod command;
pub mod error;
pub mod money;
pub mod navigation;
pub mod preview;
pub mod pricing;
pub mod promotion;
pub mod storefront;
pub mod types;

// Re-export commonly used types
pub use cart::{CartEntry, CartLine, CartStore, DiscountEntry};
pub use catalog::{MenuCatalog, MenuItem};
pub use checkout::{BuyerInput, CheckoutPhase, CheckoutValidator, Confirmation, ValidationReport};
pub use command::{Command, Outcome};
pub use error::{Error, Result};
pub use money::Amount;
pub use preview::{CartPreview, PreviewEntry};
pub use pricing::LineView;
pub use promotion::{PromotionEngine, PromotionOffer, PromotionPhase, PromotionPolicy, PromotionState};
pub use storefront::{Observation, Storefront};
pub use types::*;

/// Coffee Cart version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
