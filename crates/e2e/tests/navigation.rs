use coffeecart_common::{Command, ItemId, Route};
use coffeecart_daemon::{DaemonConfig, StateManager};
use test_case::test_case;

fn session_on(route: Route) -> StateManager {
    let state = StateManager::new(&DaemonConfig::default()).unwrap();
    state.apply(Command::Navigate { route }).unwrap();
    state
}

#[test_case(Route::Menu ; "from menu")]
#[test_case(Route::Cart ; "from cart")]
#[test_case(Route::Github ; "from github")]
fn navigation_has_three_links(route: Route) {
    let nav = session_on(route).observe().unwrap().nav;

    assert_eq!(nav.len(), 3);
    let labels: Vec<&str> = nav.iter().map(|link| link.label.as_str()).collect();
    assert_eq!(labels, vec!["menu", "cart (0)", "github"]);
}

/// Each link leads to its own page, wherever it is clicked from
#[test_case(Route::Menu ; "from menu")]
#[test_case(Route::Cart ; "from cart")]
#[test_case(Route::Github ; "from github")]
fn navigation_links_are_valid(route: Route) {
    for target in Route::ALL {
        let state = session_on(route);
        let link = state
            .observe()
            .unwrap()
            .nav
            .into_iter()
            .find(|link| link.route == target)
            .unwrap();
        assert_eq!(link.path, target.path());

        let observation = state.apply(Command::Navigate { route: link.route }).unwrap();
        assert_eq!(observation.route, target);
    }
}

#[test_case(Route::Menu ; "on menu")]
#[test_case(Route::Cart ; "on cart")]
#[test_case(Route::Github ; "on github")]
fn only_current_page_is_highlighted(route: Route) {
    for link in session_on(route).observe().unwrap().nav {
        assert_eq!(link.active, link.route == route, "link {}", link.label);
    }
}

#[test_case(1 ; "one cup")]
#[test_case(4 ; "four cups")]
#[test_case(10 ; "ten cups")]
fn cart_link_counts_cups(cups: u32) {
    let state = session_on(Route::Menu);
    for _ in 0..cups {
        state
            .apply(Command::Activate {
                item: ItemId::from("cafe-latte"),
            })
            .unwrap();
    }

    let observation = state.observe().unwrap();
    assert_eq!(observation.nav[1].label, format!("cart ({})", cups));
    assert_eq!(observation.cart_count, cups);
}

#[test]
fn routes_parse_from_names_and_paths() {
    for route in Route::ALL {
        assert_eq!(route.to_string().parse::<Route>().unwrap(), route);
        assert_eq!(route.path().parse::<Route>().unwrap(), route);
    }
    assert_eq!("/orders".parse::<Route>().unwrap_err().code(), "unknown_route");
}
