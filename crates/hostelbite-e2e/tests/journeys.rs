//! Storefront journeys against the mock storefront
//!
//! Run with: cargo test -p hostelbite-e2e --test journeys

#[path = "common/browser.rs"]
mod browser;
#[path = "common/storefront.rs"]
mod storefront;

use hostelbite_e2e::actions::{order_confirmed_heading, remove_item_buttons, routes, search_input};
use hostelbite_e2e::config::{ConfigResolver, DEFAULT_SEED_EMAIL};
use hostelbite_e2e::{scenarios, HarnessConfig, HarnessError, Locator, ScenarioRunner, Storefront};
use std::collections::HashMap;
use std::time::Duration;
use storefront::{DrinkFilter, MockStorefront};

macro_rules! session_for {
    ($shop:expr) => {
        match browser::require_session(browser::test_config(&$shop.base_url())).await {
            Some(session) => session,
            None => return,
        }
    };
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_seed_login_reaches_products() {
    skip_if_no_chrome!();
    let shop = MockStorefront::start().await;
    let mut session = session_for!(shop);

    scenarios::login(&session).await.expect("Login should pass");

    let url = session.current_url().await.unwrap();
    assert!(url.contains(routes::PRODUCTS), "url was {}", url);
    let user = session
        .local_storage_item("hostelbite_user")
        .await
        .unwrap()
        .expect("User should be stored");
    assert!(user.contains(DEFAULT_SEED_EMAIL));

    session.stop().await.unwrap();
}

#[tokio::test]
async fn test_invalid_login_times_out_on_login_page() {
    skip_if_no_chrome!();
    let shop = MockStorefront::start().await;
    let mut session = session_for!(shop);
    let front = Storefront::new(&session);

    session.clear_session().await.unwrap();
    front.open_login().await.unwrap();
    front
        .login(DEFAULT_SEED_EMAIL, "not-the-password")
        .await
        .expect("Form submission itself should work");

    let err = front.wait_for_products_page().await.unwrap_err();
    match err {
        HarnessError::WaitTimeout {
            condition,
            last_observed,
            ..
        } => {
            assert_eq!(condition, "url contains '/products'");
            assert!(last_observed.contains(routes::LOGIN), "{}", last_observed);
        }
        other => panic!("Expected WaitTimeout, got {:?}", other),
    }

    session.stop().await.unwrap();
}

#[tokio::test]
async fn test_register_new_account() {
    skip_if_no_chrome!();
    let shop = MockStorefront::start().await;
    let mut session = session_for!(shop);

    scenarios::register(&session)
        .await
        .expect("Registration should pass");

    let user = session
        .local_storage_item("hostelbite_user")
        .await
        .unwrap()
        .expect("User should be stored");
    assert!(user.contains("@hostelbite.test"));
    assert!(user.contains("A-101"));

    session.stop().await.unwrap();
}

// ============================================================================
// Cart & checkout
// ============================================================================

#[tokio::test]
async fn test_add_to_cart_shows_remove_control() {
    skip_if_no_chrome!();
    let shop = MockStorefront::start().await;
    let mut session = session_for!(shop);

    scenarios::add_to_cart(&session)
        .await
        .expect("Add to cart should pass");
    assert!(session.count(&remove_item_buttons()).await.unwrap() >= 1);

    session.stop().await.unwrap();
}

#[tokio::test]
async fn test_checkout_confirms_order() {
    skip_if_no_chrome!();
    let shop = MockStorefront::start().await;
    let mut session = session_for!(shop);

    scenarios::checkout(&session)
        .await
        .expect("Checkout should pass");

    let state = session
        .element_state(&Locator::css("#app p"))
        .await
        .unwrap();
    assert_eq!(state.text.as_deref(), Some("Delivering to room A-101"));
    assert_eq!(
        session.local_storage_item("hostelbite_cart").await.unwrap(),
        None
    );

    session.stop().await.unwrap();
}

#[tokio::test]
async fn test_checkout_in_slow_motion() {
    skip_if_no_chrome!();
    let shop = MockStorefront::start().await;
    let config = HarnessConfig {
        slow_mo: Duration::from_millis(50),
        ..browser::test_config(&shop.base_url())
    };
    let Some(mut session) = browser::require_session(config).await else {
        return;
    };

    scenarios::checkout(&session)
        .await
        .expect("Checkout should pass with slow motion");

    // Room typed key by key still arrives intact
    let state = session
        .element_state(&Locator::css("#app p"))
        .await
        .unwrap();
    assert_eq!(state.text.as_deref(), Some("Delivering to room A-101"));

    // Clicked controls are outlined before the click
    let outline: String = session
        .eval(&format!(
            "{}[0].style.outlineStyle",
            Locator::button("Place Order").to_js()
        ))
        .await
        .unwrap();
    assert_eq!(outline, "solid");

    session.stop().await.unwrap();
}

#[tokio::test]
async fn test_checkout_without_room_is_blocked() {
    skip_if_no_chrome!();
    let shop = MockStorefront::start().await;
    let mut session = session_for!(shop);

    scenarios::checkout_without_room(&session)
        .await
        .expect("Boundary scenario should pass");

    assert!(!session.exists(&order_confirmed_heading()).await.unwrap());
    let toast = session
        .element_state(&Locator::css(".toast"))
        .await
        .unwrap();
    assert_eq!(toast.text.as_deref(), Some("Please enter your room number"));

    session.stop().await.unwrap();
}

// ============================================================================
// Search & filter
// ============================================================================

#[tokio::test]
async fn test_search_and_filter_with_drink_label() {
    skip_if_no_chrome!();
    let shop = MockStorefront::with_drink_filter(DrinkFilter::Drink).await;
    let mut session = session_for!(shop);

    scenarios::search_and_filter(&session)
        .await
        .expect("Search and filter should pass");

    // Only the two drinks remain after filtering
    assert_eq!(session.count(&Locator::css("#products h3")).await.unwrap(), 2);

    session.stop().await.unwrap();
}

#[tokio::test]
async fn test_filter_falls_back_to_beverages_label() {
    skip_if_no_chrome!();
    let shop = MockStorefront::with_drink_filter(DrinkFilter::Beverages).await;
    let mut session = session_for!(shop);

    scenarios::search_and_filter(&session)
        .await
        .expect("Fallback label should be used");
    assert_eq!(session.count(&Locator::css("#products h3")).await.unwrap(), 2);

    session.stop().await.unwrap();
}

#[tokio::test]
async fn test_filter_missing_both_labels() {
    skip_if_no_chrome!();
    let shop = MockStorefront::with_drink_filter(DrinkFilter::Missing).await;
    let mut session = session_for!(shop);
    let front = Storefront::new(&session);

    session.clear_session().await.unwrap();
    front.login_as_seed_user().await.unwrap();

    let err = front.click_filter("Drink", "Beverages").await.unwrap_err();
    match err {
        HarnessError::ElementNotFound { locator, .. } => {
            assert_eq!(locator, "button 'Drink' or button 'Beverages'");
        }
        other => panic!("Expected ElementNotFound, got {:?}", other),
    }

    session.stop().await.unwrap();
}

#[tokio::test]
async fn test_search_then_clear_restores_catalogue() {
    skip_if_no_chrome!();
    let shop = MockStorefront::start().await;
    let mut session = session_for!(shop);
    let front = Storefront::new(&session);

    session.clear_session().await.unwrap();
    front.login_as_seed_user().await.unwrap();

    front.search("Oreo").await.unwrap();
    assert_eq!(session.count(&Locator::css("#products h3")).await.unwrap(), 1);

    assert_eq!(session.input_value(&search_input()).await.unwrap(), "Oreo");

    front.clear_search().await.unwrap();
    assert_eq!(session.input_value(&search_input()).await.unwrap(), "");
    assert_eq!(session.count(&Locator::css("#products h3")).await.unwrap(), 4);

    session.stop().await.unwrap();
}

// ============================================================================
// Runner
// ============================================================================

#[tokio::test]
async fn test_full_suite_passes_against_mock() {
    skip_if_no_chrome!();
    let shop = MockStorefront::start().await;

    // Probe for Chrome before handing off to the runner
    let mut probe = session_for!(shop);
    probe.stop().await.unwrap();

    let resolver = ConfigResolver::with_env(HashMap::new())
        .with_override("baseUrl", shop.base_url())
        .with_override("headless", "true")
        .with_override("waitTimeoutMs", "4000")
        .with_override("pollIntervalMs", "100")
        .with_override("implicitWaitMs", "500");
    let runner = ScenarioRunner::new(resolver).with_parallelism(2);

    let results = runner.run_suite("mock", scenarios::ALL).await;
    for outcome in results.failures() {
        eprintln!("{} failed: {:?}", outcome.name, outcome.error);
    }
    assert!(results.passed);
    assert_eq!(results.exit_code(), 0);

    let names: Vec<_> = results.outcomes.iter().map(|o| o.name.as_str()).collect();
    let expected: Vec<_> = scenarios::names().collect();
    assert_eq!(names, expected);
}
