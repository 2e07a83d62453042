use coffeecart_common::{Command, ItemId};
use coffeecart_daemon::{DaemonConfig, StateManager};
use test_case::test_case;

fn submit(name: &str, email: &str) -> Command {
    Command::SubmitCheckout {
        name: name.to_string(),
        email: email.to_string(),
        promotional_emails: false,
    }
}

fn open_cart() -> StateManager {
    let state = StateManager::new(&DaemonConfig::default()).unwrap();
    for item in ["espresso", "mocha"] {
        state
            .apply(Command::Activate {
                item: ItemId::from(item),
            })
            .unwrap();
    }
    state.apply(Command::OpenCheckout).unwrap();
    state
}

#[test_case("", "" ; "empty form")]
#[test_case("", "test@test.com" ; "missing name")]
#[test_case("Test name", "" ; "missing email")]
#[test_case("Test name", "test" ; "email without domain")]
#[test_case("Test name", "test@test" ; "domain without dot")]
#[test_case("   ", "test@test.com" ; "blank name")]
#[tokio::test]
async fn invalid_details_keep_modal_open(name: &str, email: &str) {
    let state = open_cart();

    let err = state.apply(submit(name, email)).unwrap_err();
    assert_eq!(err.code(), "validation_failed");

    let observation = state.observe().unwrap();
    assert!(observation.checkout.open);
    assert!(observation.checkout.last_failure.is_some());
    assert!(observation.confirmation.is_none());
    assert_eq!(observation.total, "Total: $18.00");
}

/// A valid purchase empties the cart and shows the confirmation
#[tokio::test(start_paused = true)]
async fn valid_details_place_order() {
    let state = open_cart();

    let observation = state.apply(submit("Test name", "test@test.com")).unwrap();
    assert!(!observation.checkout.open);
    assert_eq!(observation.total, "Total: $0.00");
    assert_eq!(observation.nav[1].label, "cart (0)");

    let confirmation = observation.confirmation.unwrap();
    assert_eq!(confirmation.items, 2);
    assert_eq!(confirmation.total.to_string(), "$18.00");
    assert!(state.expiry_armed());
}

#[tokio::test]
async fn closing_checkout_discards_typed_details() {
    let state = open_cart();
    state.apply(submit("", "test")).unwrap_err();

    let observation = state.apply(Command::CloseCheckout).unwrap();
    assert!(!observation.checkout.open);
    assert_eq!(observation.total, "Total: $18.00");

    let observation = state.apply(Command::OpenCheckout).unwrap();
    assert!(observation.checkout.input.email.is_empty());
    assert!(observation.checkout.last_failure.is_none());
}
