//! Declarative YAML scenario specification

use coffeecart_common::{Amount, EntryId, ItemId, Route};
use coffeecart_daemon::DaemonConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{E2eError, E2eResult};

/// A complete scenario parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSpec {
    /// Unique name for this test
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering tests
    #[serde(default)]
    pub tags: Vec<String>,

    /// Session configuration; the runner's configuration when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<DaemonConfig>,

    /// Steps to execute in order
    pub steps: Vec<TestStep>,
}

/// A single step in a test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestStep {
    #[serde(flatten)]
    pub action: Action,

    /// Error code the step must be rejected with, e.g. `no_pending_offer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_error: Option<String>,
}

/// What a step does to the storefront
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Click a menu cup
    Activate {
        item: ItemId,
        #[serde(default = "default_times")]
        times: u32,
    },

    /// Click every menu cup once, in menu order
    ActivateAll,

    /// "+" on a cart line
    Increment { entry: EntryId },

    /// "-" on a cart line
    Decrement { entry: EntryId },

    /// Delete a cart line
    Remove { entry: EntryId },

    AcceptPromotion,

    DiscardPromotion,

    /// Move the pointer onto the pay button
    Hover,

    /// Move the pointer off the pay button
    Unhover,

    /// Click the pay button
    OpenCheckout,

    CloseCheckout,

    /// Fill in and submit the payment details form
    Submit {
        #[serde(default)]
        name: String,
        #[serde(default)]
        email: String,
        #[serde(default)]
        promotional_emails: bool,
    },

    Navigate { route: Route },

    /// Double-click a menu header, or every header when no item is given
    ToggleLanguage {
        #[serde(default)]
        item: Option<ItemId>,
    },

    /// Let time pass
    Sleep { ms: u64 },

    /// Check what the storefront shows
    Assert(Expectation),

    /// Log a message (for debugging)
    Log { message: String },
}

fn default_times() -> u32 {
    1
}

/// Observable facts a step can check; unset fields are not checked
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Expectation {
    /// Cart total, e.g. `"$29.00"`
    pub total: Option<Amount>,
    pub cart_count: Option<u32>,
    pub route: Option<Route>,

    /// Cart lines in display order
    pub lines: Option<Vec<LineExpectation>>,

    pub promotion_visible: Option<bool>,
    pub promotion_message: Option<String>,

    pub preview_visible: Option<bool>,
    /// Preview entry names in display order
    pub preview: Option<Vec<String>>,

    pub checkout_open: Option<bool>,
    pub missing_name: Option<bool>,
    pub invalid_email: Option<bool>,

    pub confirmation_visible: Option<bool>,
    pub confirmation_message: Option<String>,

    /// Navigation link labels in bar order
    pub nav: Option<Vec<String>>,
    pub active_link: Option<Route>,

    /// Menu card headers in menu order
    pub menu_names: Option<Vec<String>>,

    pub empty_cart_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineExpectation {
    pub entry: EntryId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub unit_price: Option<Amount>,
    #[serde(default)]
    pub line_total: Option<Amount>,
}

impl TestStep {
    /// Name used in step reports
    pub fn name(&self) -> String {
        match &self.action {
            Action::Activate { item, times: 1 } => format!("activate:{}", item),
            Action::Activate { item, times } => format!("activate:{}x{}", item, times),
            Action::ActivateAll => "activate_all".to_string(),
            Action::Increment { entry } => format!("increment:{}", entry),
            Action::Decrement { entry } => format!("decrement:{}", entry),
            Action::Remove { entry } => format!("remove:{}", entry),
            Action::AcceptPromotion => "accept_promotion".to_string(),
            Action::DiscardPromotion => "discard_promotion".to_string(),
            Action::Hover => "hover".to_string(),
            Action::Unhover => "unhover".to_string(),
            Action::OpenCheckout => "open_checkout".to_string(),
            Action::CloseCheckout => "close_checkout".to_string(),
            Action::Submit { email, .. } => format!("submit:{}", email),
            Action::Navigate { route } => format!("navigate:{}", route),
            Action::ToggleLanguage { item: Some(item) } => format!("toggle_language:{}", item),
            Action::ToggleLanguage { item: None } => "toggle_language:all".to_string(),
            Action::Sleep { ms } => format!("sleep:{}ms", ms),
            Action::Assert(_) => "assert".to_string(),
            Action::Log { message } => {
                format!("log:{}", message.chars().take(30).collect::<String>())
            }
        }
    }
}

impl TestSpec {
    /// Parse a test spec from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        serde_yaml::from_str(yaml).map_err(E2eError::from)
    }

    /// Parse a test spec from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| E2eError::SpecParse(format!("{}: {}", path.display(), e)))
    }

    /// Load all test specs from a directory, in file name order
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut specs = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            let spec = Self::from_file(entry.path())?;
            specs.push(spec);
        }

        Ok(specs)
    }

    /// Filter specs by tag
    pub fn filter_by_tag<'a>(specs: &'a [Self], tag: &str) -> Vec<&'a Self> {
        specs.iter().filter(|s| s.tags.iter().any(|t| t == tag)).collect()
    }
}
