use coffeecart_common::{Amount, Command, EntryId, ItemId, Observation};
use coffeecart_daemon::{DaemonConfig, StateManager};
use regex::Regex;

const ENGLISH_NAMES: [&str; 9] = [
    "Espresso",
    "Espresso Macchiato",
    "Cappuccino",
    "Mocha",
    "Flat White",
    "Americano",
    "Cafe Latte",
    "Espresso Con Panna",
    "Cafe Breve",
];

const CHINESE_NAMES: [&str; 9] = [
    "特浓咖啡",
    "浓缩玛奇朵",
    "卡布奇诺",
    "摩卡",
    "平白咖啡",
    "美式咖啡",
    "拿铁",
    "浓缩康宝蓝",
    "半拿铁",
];

fn session() -> StateManager {
    StateManager::new(&DaemonConfig::default()).unwrap()
}

fn activate(state: &StateManager, item: &ItemId) -> Observation {
    state.apply(Command::Activate { item: item.clone() }).unwrap()
}

fn menu_ids(state: &StateManager) -> Vec<ItemId> {
    state.observe().unwrap().menu.into_iter().map(|card| card.id).collect()
}

fn menu_names(observation: &Observation) -> Vec<&str> {
    observation.menu.iter().map(|card| card.name.as_str()).collect()
}

fn toggle_all(state: &StateManager) -> Observation {
    for item in menu_ids(state) {
        state.apply(Command::ToggleLanguage { item }).unwrap();
    }
    state.observe().unwrap()
}

#[test]
fn menu_headers_start_in_english() {
    assert_eq!(menu_names(&session().observe().unwrap()), ENGLISH_NAMES);
}

/// A double-click switches one header to Chinese; a second one switches it back
#[test]
fn headers_toggle_between_english_and_chinese() {
    let state = session();

    assert_eq!(menu_names(&toggle_all(&state)), CHINESE_NAMES);
    assert_eq!(menu_names(&toggle_all(&state)), ENGLISH_NAMES);
}

#[test]
fn prices_are_dollar_labels_with_two_decimals() {
    let pattern = Regex::new(r"^\$[0-9]+\.[0-9]{2}$").unwrap();

    for card in session().observe().unwrap().menu {
        assert!(pattern.is_match(&card.price), "bad price label {}", card.price);
    }
}

#[test]
fn total_is_zero_initially() {
    let observation = session().observe().unwrap();
    assert_eq!(observation.total, "Total: $0.00");
    assert!(observation.total_amount.is_zero());
}

/// Each cup adds exactly its listed price to the pay button
#[test]
fn adding_every_coffee_increases_total() {
    let state = session();
    let mut expected = Amount::ZERO;

    for card in state.observe().unwrap().menu {
        expected = expected + Amount::parse(&card.price).unwrap();
        let observation = activate(&state, &card.id);
        assert_eq!(observation.total_amount, expected);
    }

    assert_eq!(expected, Amount::from_cents(11900));
}

#[test]
fn repeated_cups_give_exact_totals() {
    for item in menu_ids(&session()) {
        let state = session();
        let price = state.with_storefront(|s| s.catalog().get(&item).unwrap().unit_price);

        for n in 1..=10u32 {
            let observation = activate(&state, &item);
            assert_eq!(observation.total_amount, price.times(n));
        }

        let entry = EntryId::Ordinary(item);
        let quantity = state.with_storefront(|s| s.cart().get(&entry).map(|line| line.quantity()));
        assert_eq!(quantity, Some(10));
    }
}

#[test]
fn preview_needs_hover_and_a_non_empty_cart() {
    let state = session();

    state.apply(Command::FocusCheckout).unwrap();
    assert!(state.observe().unwrap().preview.is_none());

    state.apply(Command::BlurCheckout).unwrap();
    activate(&state, &ItemId::from("espresso"));
    assert!(state.observe().unwrap().preview.is_none());

    let observation = state.apply(Command::FocusCheckout).unwrap();
    assert_eq!(observation.preview.unwrap().entries().len(), 1);
}

#[test]
fn ordered_coffees_show_up_once_in_preview() {
    let state = session();
    for item in menu_ids(&state) {
        activate(&state, &item);
    }

    let preview = state.apply(Command::FocusCheckout).unwrap().preview.unwrap();
    assert_eq!(preview.entries().len(), 9);

    let names = preview.names();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);

    for entry in preview.entries() {
        assert!(ENGLISH_NAMES.contains(&entry.name.as_str()));
        assert_eq!(entry.quantity, 1);
        assert!(entry.controls.increment);
        assert!(entry.controls.decrement);
    }
}

/// "+" then "-" on every preview entry returns it to one cup
#[test]
fn preview_plus_and_minus_change_quantities() {
    let state = session();
    for item in menu_ids(&state) {
        activate(&state, &item);
    }
    state.apply(Command::FocusCheckout).unwrap();

    for item in menu_ids(&state) {
        let entry = EntryId::Ordinary(item);

        let observation = state.apply(Command::Increment { entry: entry.clone() }).unwrap();
        let line = observation.lines.iter().find(|l| l.id == entry).unwrap();
        assert_eq!(line.quantity, 2);

        let observation = state.apply(Command::Decrement { entry: entry.clone() }).unwrap();
        let line = observation.lines.iter().find(|l| l.id == entry).unwrap();
        assert_eq!(line.quantity, 1);
    }
}

/// Removing the last cup of every entry eventually hides the preview
#[test]
fn removing_single_cups_from_preview_deletes_entries() {
    let state = session();
    let ids = menu_ids(&state);
    for item in &ids {
        activate(&state, item);
    }
    state.apply(Command::FocusCheckout).unwrap();

    for (removed, item) in ids.into_iter().enumerate() {
        let observation = state
            .apply(Command::Decrement {
                entry: EntryId::Ordinary(item),
            })
            .unwrap();

        match observation.preview {
            Some(preview) => assert_eq!(preview.entries().len(), 9 - removed - 1),
            None => assert_eq!(removed, 8),
        }
    }
}

#[test]
fn promo_is_not_displayed_initially() {
    assert!(session().observe().unwrap().promotion.is_none());
}

/// The offer only shows right after every third cup
#[test]
fn ordering_three_coffees_shows_promo() {
    let state = session();
    let espresso = ItemId::from("espresso");

    for n in 1..=9u32 {
        let observation = activate(&state, &espresso);
        assert_eq!(observation.promotion.is_some(), n % 3 == 0, "after cup {}", n);
    }
}

#[test]
fn discarding_promo_changes_nothing() {
    let state = session();
    for _ in 0..3 {
        activate(&state, &ItemId::from("cappuccino"));
    }
    let before = state.observe().unwrap();
    assert!(before.promotion.is_some());

    let after = state.apply(Command::DiscardPromotion).unwrap();
    assert!(after.promotion.is_none());
    assert_eq!(after.total_amount, before.total_amount);
    assert_eq!(after.lines, before.lines);
}

#[test]
fn accepting_promo_adds_fixed_price_cup() {
    let state = session();
    for _ in 0..3 {
        activate(&state, &ItemId::from("americano"));
    }

    let observation = state.apply(Command::AcceptPromotion).unwrap();
    assert_eq!(observation.total, "Total: $25.00");
    assert_eq!(observation.lines.len(), 2);

    let discount = &observation.lines[1];
    assert!(discount.discounted);
    assert_eq!(discount.name, "(Discounted) Mocha");
    assert_eq!(discount.unit_desc(), "$4.00 x 1");
}
