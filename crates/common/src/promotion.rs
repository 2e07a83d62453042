//! Loyalty promotion engine
//!
//! Every ordinary unit added to the cart advances a counter. When the
//! counter lands on a positive multiple of the threshold an offer becomes
//! pending. The offer is resolved by `accept` (which injects a discounted
//! line into the cart) or `discard`; left alone, it is withdrawn by the next
//! ordinary addition. Each multiple produces at most one offer.
//!
//! Discounted units do not advance the counter.

use crate::cart::CartStore;
use crate::catalog::MenuCatalog;
use crate::money::Amount;
use crate::types::{EntryId, ItemId};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Promotion parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionPolicy {
    /// Ordinary additions per offer
    #[serde(default = "default_threshold")]
    pub threshold: u32,

    /// Item granted when an offer is accepted
    #[serde(default = "default_item")]
    pub item: ItemId,

    /// Fixed price of the granted item, independent of its unit price
    #[serde(default = "default_price")]
    pub price: Amount,
}

fn default_threshold() -> u32 {
    3
}

fn default_item() -> ItemId {
    ItemId::from("mocha")
}

fn default_price() -> Amount {
    Amount::from_cents(400)
}

impl Default for PromotionPolicy {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            item: default_item(),
            price: default_price(),
        }
    }
}

impl PromotionPolicy {
    /// Check the policy against the catalog it will run with
    pub fn validate(&self, catalog: &MenuCatalog) -> Result<()> {
        if self.threshold == 0 {
            return Err(Error::InvalidConfig(
                "promotion threshold must be at least 1".to_string(),
            ));
        }
        if !catalog.contains(&self.item) {
            return Err(Error::InvalidConfig(format!(
                "promoted item {} is not on the menu",
                self.item
            )));
        }
        Ok(())
    }
}

/// Observable promotion phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionPhase {
    Idle,
    OfferPending,
}

/// Counter and pending flag, as exposed to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionState {
    pub ordinary_item_counter: u32,
    pub offer_pending: bool,
}

/// A pending offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionOffer {
    pub item_id: ItemId,
    pub fixed_price: Amount,
    /// Which multiple of the threshold raised this offer (1 for the 3rd
    /// addition, 2 for the 6th, ...)
    pub multiple: u32,
}

#[derive(Debug, Clone)]
pub struct PromotionEngine {
    policy: PromotionPolicy,
    counter: u32,
    pending: Option<PromotionOffer>,
    last_offered_multiple: u32,
}

impl PromotionEngine {
    pub fn new(policy: PromotionPolicy) -> Self {
        Self {
            policy,
            counter: 0,
            pending: None,
            last_offered_multiple: 0,
        }
    }

    pub fn policy(&self) -> &PromotionPolicy {
        &self.policy
    }

    /// Count one ordinary addition
    ///
    /// Returns `true` when this addition raised a new offer.
    pub fn record_addition(&mut self) -> bool {
        self.counter += 1;

        if let Some(stale) = self.pending.take() {
            debug!(
                "Promotion offer #{} withdrawn after further addition",
                stale.multiple
            );
        }

        if self.counter % self.policy.threshold != 0 {
            return false;
        }

        let multiple = self.counter / self.policy.threshold;
        if multiple <= self.last_offered_multiple {
            return false;
        }

        self.last_offered_multiple = multiple;
        self.pending = Some(PromotionOffer {
            item_id: self.policy.item.clone(),
            fixed_price: self.policy.price,
            multiple,
        });
        info!(
            "Promotion offer #{} raised at {} ordinary additions",
            multiple, self.counter
        );
        true
    }

    /// Accept the pending offer, adding one discounted unit to the cart
    pub fn accept(&mut self, cart: &mut CartStore) -> Result<EntryId> {
        let offer = self.pending.take().ok_or(Error::NoPendingOffer)?;
        let quantity = cart.add_discount(&offer.item_id, offer.fixed_price);

        info!(
            "Promotion offer #{} accepted: {} at {} (discounted quantity {})",
            offer.multiple, offer.item_id, offer.fixed_price, quantity
        );
        Ok(EntryId::Discounted(offer.item_id))
    }

    /// Decline the pending offer without touching the cart
    pub fn discard(&mut self) -> Result<()> {
        let offer = self.pending.take().ok_or(Error::NoPendingOffer)?;
        info!("Promotion offer #{} discarded", offer.multiple);
        Ok(())
    }

    /// The pending offer, if one is showing
    pub fn offer(&self) -> Result<&PromotionOffer> {
        self.pending
            .as_ref()
            .ok_or_else(|| Error::not_available("promotion offer"))
    }

    pub fn phase(&self) -> PromotionPhase {
        if self.pending.is_some() {
            PromotionPhase::OfferPending
        } else {
            PromotionPhase::Idle
        }
    }

    pub fn state(&self) -> PromotionState {
        PromotionState {
            ordinary_item_counter: self.counter,
            offer_pending: self.pending.is_some(),
        }
    }

    pub fn reset(&mut self) {
        self.counter = 0;
        self.pending = None;
        self.last_offered_multiple = 0;
    }
}

impl Default for PromotionEngine {
    fn default() -> Self {
        Self::new(PromotionPolicy::default())
    }
}
