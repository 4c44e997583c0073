use futures::future::LocalBoxFuture;

use crate::actions::{remove_item_buttons, routes, Storefront};
use crate::error::Result;
use crate::scenario::ensure;
use crate::session::Session;
use crate::wait::Condition;

/// Add the first product and check the cart lists it
pub async fn add_to_cart(session: &Session) -> Result<()> {
    let shop = Storefront::new(session);
    session.clear_session().await?;

    shop.login_as_seed_user().await?;
    session.slow_down().await;

    shop.add_first_product_to_cart().await?;
    session.slow_down().await;

    shop.open_cart().await?;
    let remove = remove_item_buttons();
    session
        .wait_for(&Condition::CountAtLeast(remove.clone(), 1))
        .await?;

    let items = session.count(&remove).await?;
    ensure(
        items >= 1,
        "cart items",
        "at least one remove control",
        format!("{} remove controls", items),
    )?;
    shop.assert_url_contains(routes::CART).await
}

pub(super) fn add_to_cart_boxed(session: &Session) -> LocalBoxFuture<'_, Result<()>> {
    Box::pin(add_to_cart(session))
}
