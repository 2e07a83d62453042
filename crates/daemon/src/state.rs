//! Shared session state for the daemon

use crate::config::DaemonConfig;
use coffeecart_common::{Command, Error, Observation, Outcome, Result, Storefront};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Owner of the session's storefront
///
/// Cloning is cheap and every clone refers to the same session. Each
/// command holds the lock for exactly one transition.
#[derive(Clone)]
pub struct StateManager {
    config: DaemonConfig,
    storefront: Arc<Mutex<Storefront>>,
    /// Cancels the armed confirmation expiry, if any
    expiry: Arc<Mutex<Option<CancellationToken>>>,
}

impl StateManager {
    /// Create a new state manager
    pub fn new(config: &DaemonConfig) -> Result<Self> {
        let storefront = config.storefront()?;

        Ok(Self {
            config: config.clone(),
            storefront: Arc::new(Mutex::new(storefront)),
            expiry: Arc::new(Mutex::new(None)),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &DaemonConfig {
        &self.config
    }

    /// Apply a command and return what the storefront looks like afterwards
    ///
    /// A successful checkout arms the confirmation expiry on the current
    /// tokio runtime; without a runtime the checkout is refused before
    /// anything changes.
    pub fn apply(&self, command: Command) -> Result<Observation> {
        let runtime = match command {
            Command::SubmitCheckout { .. } => Some(Handle::try_current().map_err(|_| {
                Error::Internal("confirmation timer needs a tokio runtime".to_string())
            })?),
            _ => None,
        };

        let mut storefront = self.storefront.lock();

        if matches!(command, Command::OpenCheckout) {
            self.cancel_expiry();
        }

        let outcome = storefront.apply(command)?;

        if let (Outcome::Confirmed(confirmation), Some(runtime)) = (outcome, runtime) {
            self.arm_expiry(&runtime, confirmation.generation, self.config.confirmation_ttl());
        }

        storefront.observe()
    }

    /// Current observation without changing anything
    pub fn observe(&self) -> Result<Observation> {
        self.storefront.lock().observe()
    }

    /// Run a read-only closure against the storefront
    pub fn with_storefront<R>(&self, f: impl FnOnce(&Storefront) -> R) -> R {
        f(&self.storefront.lock())
    }

    /// Whether a confirmation expiry is currently armed
    pub fn expiry_armed(&self) -> bool {
        self.expiry
            .lock()
            .as_ref()
            .map(|token| !token.is_cancelled())
            .unwrap_or(false)
    }

    fn arm_expiry(&self, runtime: &Handle, generation: u64, ttl: Duration) {
        self.cancel_expiry();

        let token = CancellationToken::new();
        *self.expiry.lock() = Some(token.clone());

        // The deadline is fixed now, not when the task is first polled.
        let expires = tokio::time::sleep(ttl);
        let storefront = Arc::clone(&self.storefront);
        runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Confirmation expiry #{} cancelled", generation);
                }
                _ = expires => {
                    storefront.lock().expire_confirmation(generation);
                    token.cancel();
                }
            }
        });

        debug!("Confirmation expiry #{} armed for {:?}", generation, ttl);
    }

    fn cancel_expiry(&self) {
        if let Some(token) = self.expiry.lock().take() {
            token.cancel();
        }
    }
}
