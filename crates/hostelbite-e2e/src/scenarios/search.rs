use futures::future::LocalBoxFuture;

use crate::actions::{routes, Storefront};
use crate::error::Result;
use crate::locator::{xpath_literal, Locator};
use crate::session::Session;

pub const SEARCH_TERM: &str = "Oreo";
pub const SEARCH_HIT: &str = "Oreo Original";

/// Filter label, and the label older builds of the storefront used
pub const DRINK_FILTER: (&str, &str) = ("Drink", "Beverages");

/// Products any one of which proves the drink filter applied
pub const DRINKS: [&str; 4] = ["Coca-Cola", "Pepsi", "Sprite", "Fanta Orange"];

/// Product card whose title is exactly one of `names`
pub fn any_card_titled(names: &[&str]) -> Locator {
    let titles = names
        .iter()
        .map(|name| format!("normalize-space()={}", xpath_literal(name)))
        .collect::<Vec<_>>()
        .join(" or ");
    Locator::xpath(format!("//h3[{}]", titles))
}

/// Search for a product, clear the search, then filter by drinks
pub async fn search_and_filter(session: &Session) -> Result<()> {
    let shop = Storefront::new(session);
    session.clear_session().await?;

    shop.login_as_seed_user().await?;
    session.slow_down().await;

    shop.search(SEARCH_TERM).await?;
    session.wait_visible(&Locator::h3_titled(SEARCH_HIT)).await?;
    session.slow_down().await;

    shop.clear_search().await?;
    shop.click_filter(DRINK_FILTER.0, DRINK_FILTER.1).await?;
    session.wait_visible(&any_card_titled(&DRINKS)).await?;
    session.slow_down().await;

    shop.assert_url_contains(routes::PRODUCTS).await
}

pub(super) fn search_and_filter_boxed(session: &Session) -> LocalBoxFuture<'_, Result<()>> {
    Box::pin(search_and_filter(session))
}
