//! Drives one storefront session through scenario steps

use coffeecart_common::{Command, ItemId, Observation};
use coffeecart_daemon::{DaemonConfig, StateManager};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::error::{E2eError, E2eResult};
use crate::spec::{Action, Expectation, TestStep};

/// Result of executing a single step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub step_name: String,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// A storefront session that scenario steps act on
pub struct StorefrontDriver {
    state: StateManager,
}

impl StorefrontDriver {
    pub fn new(config: &DaemonConfig) -> E2eResult<Self> {
        Ok(Self {
            state: StateManager::new(config)?,
        })
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Execute a single test step
    ///
    /// Timed steps need a tokio runtime; on a paused clock they complete
    /// without waiting.
    pub async fn execute_step(&self, step: &TestStep) -> StepResult {
        let start = Instant::now();
        let step_name = step.name();

        debug!("Executing step: {}", step_name);

        let result = match (self.run_action(&step.action).await, &step.expect_error) {
            (result, None) => result,
            (Err(E2eError::Storefront(e)), Some(code)) if e.code() == code => {
                debug!("Step {} rejected as expected: {}", step_name, e);
                Ok(())
            }
            (Err(e), Some(code)) => Err(E2eError::StepFailed {
                step: step_name.clone(),
                reason: format!("expected {} but got: {}", code, e),
            }),
            (Ok(()), Some(code)) => Err(E2eError::StepFailed {
                step: step_name.clone(),
                reason: format!("expected {} but the step succeeded", code),
            }),
        };

        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => StepResult {
                success: true,
                step_name,
                duration_ms,
                error: None,
            },
            Err(e) => StepResult {
                success: false,
                step_name,
                duration_ms,
                error: Some(e.to_string()),
            },
        }
    }

    async fn run_action(&self, action: &Action) -> E2eResult<()> {
        match action {
            Action::Activate { item, times } => {
                for _ in 0..*times {
                    self.apply(Command::Activate { item: item.clone() })?;
                }
            }
            Action::ActivateAll => {
                for item in self.menu_ids() {
                    self.apply(Command::Activate { item })?;
                }
            }
            Action::Increment { entry } => {
                self.apply(Command::Increment {
                    entry: entry.clone(),
                })?;
            }
            Action::Decrement { entry } => {
                self.apply(Command::Decrement {
                    entry: entry.clone(),
                })?;
            }
            Action::Remove { entry } => {
                self.apply(Command::Remove {
                    entry: entry.clone(),
                })?;
            }
            Action::AcceptPromotion => {
                self.apply(Command::AcceptPromotion)?;
            }
            Action::DiscardPromotion => {
                self.apply(Command::DiscardPromotion)?;
            }
            Action::Hover => {
                self.apply(Command::FocusCheckout)?;
            }
            Action::Unhover => {
                self.apply(Command::BlurCheckout)?;
            }
            Action::OpenCheckout => {
                self.apply(Command::OpenCheckout)?;
            }
            Action::CloseCheckout => {
                self.apply(Command::CloseCheckout)?;
            }
            Action::Submit {
                name,
                email,
                promotional_emails,
            } => {
                self.apply(Command::SubmitCheckout {
                    name: name.clone(),
                    email: email.clone(),
                    promotional_emails: *promotional_emails,
                })?;
            }
            Action::Navigate { route } => {
                self.apply(Command::Navigate { route: *route })?;
            }
            Action::ToggleLanguage { item: Some(item) } => {
                self.apply(Command::ToggleLanguage { item: item.clone() })?;
            }
            Action::ToggleLanguage { item: None } => {
                for item in self.menu_ids() {
                    self.apply(Command::ToggleLanguage { item })?;
                }
            }
            Action::Sleep { ms } => {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
                // Let timers that came due run before the next step looks.
                for _ in 0..4 {
                    tokio::task::yield_now().await;
                }
            }
            Action::Assert(expectation) => {
                verify(expectation, &self.state.observe()?)?;
            }
            Action::Log { message } => {
                info!("[TEST LOG] {}", message);
            }
        }

        Ok(())
    }

    fn apply(&self, command: Command) -> E2eResult<Observation> {
        Ok(self.state.apply(command)?)
    }

    fn menu_ids(&self) -> Vec<ItemId> {
        self.state.with_storefront(|s| {
            s.catalog()
                .items()
                .iter()
                .map(|item| item.id.clone())
                .collect()
        })
    }
}

fn compare<T: PartialEq + fmt::Debug>(
    mismatches: &mut Vec<String>,
    what: &str,
    expected: Option<&T>,
    actual: &T,
) {
    if let Some(expected) = expected {
        if expected != actual {
            mismatches.push(format!("{}: expected {:?}, got {:?}", what, expected, actual));
        }
    }
}

/// Check an observation against an expectation, reporting every mismatch
pub fn verify(expected: &Expectation, observed: &Observation) -> E2eResult<()> {
    let mut m = Vec::new();

    compare(&mut m, "total", expected.total.as_ref(), &observed.total_amount);
    compare(&mut m, "cart count", expected.cart_count.as_ref(), &observed.cart_count);
    compare(&mut m, "route", expected.route.as_ref(), &observed.route);

    if let Some(lines) = &expected.lines {
        let expected_ids: Vec<_> = lines.iter().map(|l| &l.entry).collect();
        let actual_ids: Vec<_> = observed.lines.iter().map(|l| &l.id).collect();

        if expected_ids != actual_ids {
            m.push(format!("lines: expected {:?}, got {:?}", expected_ids, actual_ids));
        } else {
            for (want, line) in lines.iter().zip(&observed.lines) {
                let what = |field: &str| format!("{} {}", line.id, field);
                compare(&mut m, &what("name"), want.name.as_ref(), &line.name);
                compare(&mut m, &what("quantity"), want.quantity.as_ref(), &line.quantity);
                compare(&mut m, &what("unit price"), want.unit_price.as_ref(), &line.unit_price);
                compare(&mut m, &what("line total"), want.line_total.as_ref(), &line.line_total);
            }
        }
    }

    compare(
        &mut m,
        "promotion visible",
        expected.promotion_visible.as_ref(),
        &observed.promotion.is_some(),
    );
    compare(
        &mut m,
        "promotion message",
        expected.promotion_message.as_ref(),
        &observed
            .promotion
            .as_ref()
            .map(|offer| offer.message.clone())
            .unwrap_or_default(),
    );

    compare(
        &mut m,
        "preview visible",
        expected.preview_visible.as_ref(),
        &observed.preview.is_some(),
    );
    compare(
        &mut m,
        "preview",
        expected.preview.as_ref(),
        &observed
            .preview
            .as_ref()
            .map(|p| p.names().into_iter().map(str::to_string).collect::<Vec<_>>())
            .unwrap_or_default(),
    );

    let failure = observed.checkout.last_failure.unwrap_or_default();
    compare(&mut m, "checkout open", expected.checkout_open.as_ref(), &observed.checkout.open);
    compare(&mut m, "missing name", expected.missing_name.as_ref(), &failure.missing_name);
    compare(&mut m, "invalid email", expected.invalid_email.as_ref(), &failure.invalid_email);

    compare(
        &mut m,
        "confirmation visible",
        expected.confirmation_visible.as_ref(),
        &observed.confirmation.is_some(),
    );
    compare(
        &mut m,
        "confirmation message",
        expected.confirmation_message.as_ref(),
        &observed
            .confirmation
            .as_ref()
            .map(|c| c.message.clone())
            .unwrap_or_default(),
    );

    compare(
        &mut m,
        "nav",
        expected.nav.as_ref(),
        &observed.nav.iter().map(|link| link.label.clone()).collect::<Vec<_>>(),
    );
    compare(
        &mut m,
        "active link",
        expected.active_link.map(Some).as_ref(),
        &observed.nav.iter().find(|link| link.active).map(|link| link.route),
    );

    compare(
        &mut m,
        "menu names",
        expected.menu_names.as_ref(),
        &observed.menu.iter().map(|card| card.name.clone()).collect::<Vec<_>>(),
    );
    compare(
        &mut m,
        "empty cart message",
        expected.empty_cart_message.as_ref(),
        &observed.empty_cart_message.clone().unwrap_or_default(),
    );

    if m.is_empty() {
        Ok(())
    } else {
        Err(E2eError::AssertionFailed(m.join("; ")))
    }
}
