//! Registered storefront journeys
//!
//! Every scenario starts by clearing session state, so each one can run on
//! its own, in any order, against a fresh browser.

mod auth;
mod cart;
mod checkout;
mod search;

use crate::scenario::ScenarioDef;

pub use auth::{login, register};
pub use cart::add_to_cart;
pub use checkout::{checkout, checkout_without_room};
pub use search::search_and_filter;

/// All scenarios, in default run order
pub const ALL: &[ScenarioDef] = &[
    ScenarioDef {
        name: "register",
        description: "Create a unique account and land on the products page",
        run: auth::register_boxed,
    },
    ScenarioDef {
        name: "login",
        description: "Sign in as the seed user and land on the products page",
        run: auth::login_boxed,
    },
    ScenarioDef {
        name: "add-to-cart",
        description: "Add the first product and see it in the cart",
        run: cart::add_to_cart_boxed,
    },
    ScenarioDef {
        name: "checkout",
        description: "Order one product for room A-101 and see the confirmation",
        run: checkout::checkout_boxed,
    },
    ScenarioDef {
        name: "checkout-without-room",
        description: "Leave the room empty and confirm the order is not placed",
        run: checkout::checkout_without_room_boxed,
    },
    ScenarioDef {
        name: "search-and-filter",
        description: "Search for Oreo, then filter the catalogue by drinks",
        run: search::search_and_filter_boxed,
    },
];

/// Look up a scenario by registry name
pub fn find(name: &str) -> Option<&'static ScenarioDef> {
    ALL.iter().find(|s| s.name == name)
}

/// Registry names, in run order
pub fn names() -> impl Iterator<Item = &'static str> {
    ALL.iter().map(|s| s.name)
}
