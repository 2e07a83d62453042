//! Daemon configuration

use coffeecart_common::{MenuCatalog, MenuItem, PromotionPolicy, Storefront};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Promotion threshold, granted item and its fixed price
    #[serde(default)]
    pub promotion: PromotionPolicy,

    /// Checkout configuration
    #[serde(default)]
    pub checkout: CheckoutConfig,

    /// Menu override; the standard coffee menu when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub catalog: Vec<MenuItem>,
}

/// Checkout-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// How long the purchase confirmation stays visible
    #[serde(default = "default_confirmation_ttl_ms")]
    pub confirmation_ttl_ms: u64,
}

fn default_confirmation_ttl_ms() -> u64 {
    3000
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            confirmation_ttl_ms: default_confirmation_ttl_ms(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from file
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn confirmation_ttl(&self) -> Duration {
        Duration::from_millis(self.checkout.confirmation_ttl_ms)
    }

    /// The configured menu
    pub fn catalog(&self) -> coffeecart_common::Result<MenuCatalog> {
        if self.catalog.is_empty() {
            Ok(MenuCatalog::coffee_menu())
        } else {
            MenuCatalog::new(self.catalog.clone())
        }
    }

    /// A fresh storefront for one session
    pub fn storefront(&self) -> coffeecart_common::Result<Storefront> {
        Storefront::new(self.catalog()?, self.promotion.clone())
    }
}
