//! Session-scoped storefront state
//!
//! [`Storefront`] owns the catalog, cart, promotion engine, checkout modal
//! and the bits of page state the UI gates behavior on (current route,
//! checkout focus, per-card name table, confirmation signal). Every
//! operation takes `&mut self`, so a single owner serializes all changes.

use crate::cart::{CartLine, CartStore};
use crate::catalog::MenuCatalog;
use crate::checkout::{BuyerInput, CheckoutValidator, Confirmation, ValidationReport};
use crate::command::{Command, Outcome};
use crate::money::Amount;
use crate::navigation::{self, NavLink, EMPTY_CART_MESSAGE};
use crate::preview::CartPreview;
use crate::pricing::{self, LineView};
use crate::promotion::{PromotionEngine, PromotionOffer, PromotionPolicy};
use crate::types::{EntryId, ItemId, Language, Route};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// A menu card as displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCard {
    pub id: ItemId,
    pub name: String,
    pub language: Language,
    /// e.g. `$10.00`
    pub price: String,
}

/// The promotion banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferView {
    pub item_id: ItemId,
    pub fixed_price: Amount,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutView {
    pub open: bool,
    pub input: BuyerInput,
    pub last_failure: Option<ValidationReport>,
}

/// Everything an observer can see at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub route: Route,
    pub nav: Vec<NavLink>,
    pub menu: Vec<MenuCard>,
    pub lines: Vec<LineView>,
    pub total_amount: Amount,
    /// Pay button caption, `Total: $<amount>`
    pub total: String,
    pub cart_count: u32,
    pub promotion: Option<OfferView>,
    pub preview: Option<CartPreview>,
    pub checkout: CheckoutView,
    pub confirmation: Option<Confirmation>,
    pub empty_cart_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Storefront {
    catalog: MenuCatalog,
    cart: CartStore,
    promotion: PromotionEngine,
    checkout: CheckoutValidator,
    languages: HashMap<ItemId, Language>,
    route: Route,
    checkout_focused: bool,
    confirmation: Option<Confirmation>,
}

impl Storefront {
    /// Create a storefront, validating the promotion against the catalog
    pub fn new(catalog: MenuCatalog, policy: PromotionPolicy) -> Result<Self> {
        policy.validate(&catalog)?;

        Ok(Self {
            catalog,
            cart: CartStore::new(),
            promotion: PromotionEngine::new(policy),
            checkout: CheckoutValidator::new(),
            languages: HashMap::new(),
            route: Route::default(),
            checkout_focused: false,
            confirmation: None,
        })
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Apply one inbound command
    pub fn apply(&mut self, command: Command) -> Result<Outcome> {
        debug!("Applying {}", command.name());

        match command {
            Command::Activate { item } => {
                self.activate(&item)?;
            }
            Command::Increment { entry } => {
                self.increment(&entry)?;
            }
            Command::Decrement { entry } => {
                self.decrement(&entry)?;
            }
            Command::Remove { entry } => self.remove_entry(&entry)?,
            Command::AcceptPromotion => {
                self.accept_promotion()?;
            }
            Command::DiscardPromotion => self.discard_promotion()?,
            Command::FocusCheckout => self.focus_checkout(),
            Command::BlurCheckout => self.blur_checkout(),
            Command::OpenCheckout => self.open_checkout(),
            Command::CloseCheckout => self.close_checkout(),
            Command::SubmitCheckout {
                name,
                email,
                promotional_emails,
            } => {
                let input = BuyerInput {
                    name,
                    email,
                    wants_promotional_emails: promotional_emails,
                };
                return self.submit_checkout(input).map(Outcome::Confirmed);
            }
            Command::Navigate { route } => self.navigate(route),
            Command::ToggleLanguage { item } => {
                self.toggle_language(&item)?;
            }
        }

        Ok(Outcome::Applied)
    }

    /// Add one unit of a menu item
    pub fn activate(&mut self, item: &ItemId) -> Result<u32> {
        let quantity = self.cart.activate(&self.catalog, item)?;
        self.promotion.record_addition();
        Ok(quantity)
    }

    /// "+" on an ordinary line; counts toward the promotion like a menu click
    pub fn increment(&mut self, entry: &EntryId) -> Result<u32> {
        let quantity = self.cart.increment(entry)?;
        self.promotion.record_addition();
        Ok(quantity)
    }

    pub fn decrement(&mut self, entry: &EntryId) -> Result<Option<u32>> {
        self.cart.decrement(entry)
    }

    pub fn remove_entry(&mut self, entry: &EntryId) -> Result<()> {
        self.cart.remove_entry(entry)
    }

    pub fn accept_promotion(&mut self) -> Result<EntryId> {
        self.promotion.accept(&mut self.cart)
    }

    pub fn discard_promotion(&mut self) -> Result<()> {
        self.promotion.discard()
    }

    pub fn focus_checkout(&mut self) {
        self.checkout_focused = true;
    }

    pub fn blur_checkout(&mut self) {
        self.checkout_focused = false;
    }

    /// Open the checkout modal
    ///
    /// Starting a new checkout cycle hides any confirmation still showing.
    pub fn open_checkout(&mut self) {
        if let Some(previous) = self.confirmation.take() {
            debug!(
                "Confirmation for order {} superseded by new checkout",
                previous.order_id
            );
        }
        self.checkout.open();
    }

    pub fn close_checkout(&mut self) {
        self.checkout.close();
    }

    pub fn submit_checkout(&mut self, input: BuyerInput) -> Result<Confirmation> {
        let total = self.total()?;
        let confirmation =
            self.checkout
                .submit(input, &mut self.cart, &mut self.promotion, total)?;
        self.confirmation = Some(confirmation.clone());
        Ok(confirmation)
    }

    /// Switch pages; an unfinished checkout form is discarded
    pub fn navigate(&mut self, route: Route) {
        if self.route != route {
            info!("Navigating {} -> {}", self.route, route);
        }
        self.route = route;
        self.checkout.close();
        self.checkout_focused = false;
    }

    /// Flip a menu card between its English and Chinese names
    pub fn toggle_language(&mut self, item: &ItemId) -> Result<Language> {
        self.catalog.get(item)?;
        let language = self.languages.entry(item.clone()).or_default();
        *language = language.toggled();
        Ok(*language)
    }

    /// Hide the confirmation if it is still the one armed as `generation`
    ///
    /// Returns `true` when a signal was hidden.
    pub fn expire_confirmation(&mut self, generation: u64) -> bool {
        match &self.confirmation {
            Some(current) if current.generation == generation => {
                info!("Confirmation for order {} expired", current.order_id);
                self.confirmation = None;
                true
            }
            _ => false,
        }
    }

    // ========================================================================
    // Observations
    // ========================================================================

    pub fn catalog(&self) -> &MenuCatalog {
        &self.catalog
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn promotion(&self) -> &PromotionEngine {
        &self.promotion
    }

    pub fn checkout(&self) -> &CheckoutValidator {
        &self.checkout
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn checkout_focused(&self) -> bool {
        self.checkout_focused
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn entries(&self) -> Vec<CartLine> {
        self.cart.entries()
    }

    pub fn lines(&self) -> Result<Vec<LineView>> {
        pricing::lines(&self.cart.entries(), &self.catalog)
    }

    pub fn total(&self) -> Result<Amount> {
        pricing::total(&self.cart.entries(), &self.catalog)
    }

    pub fn total_label(&self) -> Result<String> {
        Ok(pricing::total_label(self.total()?))
    }

    /// The preview, only while the pay button is focused and the cart has lines
    pub fn preview(&self) -> Result<CartPreview> {
        CartPreview::materialize(self.checkout_focused, &self.lines()?)
    }

    /// The promotion banner, only while an offer is pending
    pub fn offer(&self) -> Result<OfferView> {
        let offer = self.promotion.offer()?;
        self.offer_view(offer)
    }

    pub fn menu(&self) -> Vec<MenuCard> {
        self.catalog
            .items()
            .iter()
            .map(|item| {
                let language = self.languages.get(&item.id).copied().unwrap_or_default();
                MenuCard {
                    id: item.id.clone(),
                    name: item.name(language).to_string(),
                    language,
                    price: item.unit_price.to_string(),
                }
            })
            .collect()
    }

    pub fn nav(&self) -> Vec<NavLink> {
        navigation::links(self.route, self.cart.item_count())
    }

    /// Snapshot of everything observable
    pub fn observe(&self) -> Result<Observation> {
        let lines = self.lines()?;
        let total_amount = pricing::total(&self.cart.entries(), &self.catalog)?;

        let promotion = match self.promotion.offer() {
            Ok(offer) => Some(self.offer_view(offer)?),
            Err(_) => None,
        };
        let preview = CartPreview::materialize(self.checkout_focused, &lines).ok();
        let empty_cart_message = (self.route == Route::Cart && lines.is_empty())
            .then(|| EMPTY_CART_MESSAGE.to_string());

        Ok(Observation {
            route: self.route,
            nav: self.nav(),
            menu: self.menu(),
            total: pricing::total_label(total_amount),
            total_amount,
            cart_count: self.cart.item_count(),
            lines,
            promotion,
            preview,
            checkout: CheckoutView {
                open: self.checkout.is_open(),
                input: self.checkout.input().clone(),
                last_failure: self.checkout.last_failure(),
            },
            confirmation: self.confirmation.clone(),
            empty_cart_message,
        })
    }

    fn offer_view(&self, offer: &PromotionOffer) -> Result<OfferView> {
        let item = self.catalog.get(&offer.item_id)?;
        Ok(OfferView {
            item_id: offer.item_id.clone(),
            fixed_price: offer.fixed_price,
            message: format!(
                "It's your lucky day! Get an extra cup of {} for {}.",
                item.name(Language::English),
                offer.fixed_price
            ),
        })
    }
}

impl Default for Storefront {
    fn default() -> Self {
        Self {
            catalog: MenuCatalog::default(),
            cart: CartStore::new(),
            promotion: PromotionEngine::default(),
            checkout: CheckoutValidator::new(),
            languages: HashMap::new(),
            route: Route::default(),
            checkout_focused: false,
            confirmation: None,
        }
    }
}
