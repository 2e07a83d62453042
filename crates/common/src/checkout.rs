//! Checkout modal and buyer input validation
//!
//! `Closed -> Open -> Closed` on a valid submission, `Open` stays `Open`
//! on an invalid one. A successful submission empties the cart, resets the
//! promotion counter and yields a [`Confirmation`] whose visibility is
//! bounded by a timer owned by the caller.

use crate::cart::CartStore;
use crate::money::Amount;
use crate::promotion::PromotionEngine;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Text of the confirmation signal shown after a purchase
pub const CONFIRMATION_MESSAGE: &str = "Thanks for your purchase. Please check your email for payment.";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// What the buyer typed into the checkout form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub wants_promotional_emails: bool,
}

impl BuyerInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            wants_promotional_emails: false,
        }
    }

    /// Check both fields; both must pass
    pub fn validate(&self) -> ValidationReport {
        ValidationReport {
            missing_name: self.name.trim().is_empty(),
            invalid_email: !EMAIL_PATTERN.is_match(self.email.trim()),
        }
    }
}

/// Fields at fault in a rejected submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub missing_name: bool,
    pub invalid_email: bool,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        !self.missing_name && !self.invalid_email
    }

    fn into_error(self) -> Error {
        Error::ValidationFailed {
            missing_name: self.missing_name,
            invalid_email: self.invalid_email,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    Closed,
    Open,
}

/// Record of an accepted purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub total: Amount,
    pub items: u32,
    pub subscribed: bool,
    /// Increases with every confirmation; lets an expiry timer tell whether
    /// the signal it was armed for is still the one showing
    pub generation: u64,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct CheckoutValidator {
    phase: CheckoutPhase,
    input: BuyerInput,
    last_failure: Option<ValidationReport>,
    generation: u64,
}

impl CheckoutValidator {
    pub fn new() -> Self {
        Self {
            phase: CheckoutPhase::Closed,
            input: BuyerInput::default(),
            last_failure: None,
            generation: 0,
        }
    }

    /// Open the modal with a fresh, empty form
    ///
    /// Opening an already open modal keeps what was typed so far.
    pub fn open(&mut self) {
        if self.phase == CheckoutPhase::Open {
            debug!("Checkout modal already open");
            return;
        }
        self.phase = CheckoutPhase::Open;
        self.input = BuyerInput::default();
        self.last_failure = None;
        debug!("Checkout modal opened");
    }

    /// Dismiss the modal, discarding the form
    pub fn close(&mut self) {
        if self.phase == CheckoutPhase::Open {
            debug!("Checkout modal closed without purchase");
        }
        self.phase = CheckoutPhase::Closed;
        self.input = BuyerInput::default();
        self.last_failure = None;
    }

    /// Submit the form
    ///
    /// On success the cart and promotion are reset and the modal closes.
    /// On failure nothing but the recorded validation report changes.
    pub fn submit(
        &mut self,
        input: BuyerInput,
        cart: &mut CartStore,
        promotion: &mut PromotionEngine,
        total: Amount,
    ) -> Result<Confirmation> {
        if self.phase != CheckoutPhase::Open {
            return Err(Error::not_available("checkout modal"));
        }

        let report = input.validate();
        if !report.is_valid() {
            warn!(
                "Checkout rejected (missing name: {}, invalid email: {})",
                report.missing_name, report.invalid_email
            );
            self.input = input;
            self.last_failure = Some(report);
            return Err(report.into_error());
        }

        let items = cart.item_count();
        cart.reset();
        promotion.reset();

        self.generation += 1;
        self.phase = CheckoutPhase::Closed;
        self.input = BuyerInput::default();
        self.last_failure = None;

        let confirmation = Confirmation {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            total,
            items,
            subscribed: input.wants_promotional_emails,
            generation: self.generation,
            message: CONFIRMATION_MESSAGE.to_string(),
        };

        info!(
            "Order {} placed: {} item(s), {}",
            confirmation.order_id, items, total
        );
        Ok(confirmation)
    }

    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == CheckoutPhase::Open
    }

    /// Form contents as last submitted (empty right after opening)
    pub fn input(&self) -> &BuyerInput {
        &self.input
    }

    pub fn last_failure(&self) -> Option<ValidationReport> {
        self.last_failure
    }
}

impl Default for CheckoutValidator {
    fn default() -> Self {
        Self::new()
    }
}
