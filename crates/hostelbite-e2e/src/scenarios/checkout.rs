use futures::future::LocalBoxFuture;
use tracing::info;

use crate::actions::{order_confirmed_heading, routes, Storefront};
use crate::error::{HarnessError, Result};
use crate::session::Session;
use crate::wait::Condition;

/// Room used for the happy-path order
pub const DELIVERY_ROOM: &str = "A-101";

async fn reach_checkout(shop: &Storefront<'_>) -> Result<()> {
    let session = shop.session();
    session.clear_session().await?;

    shop.login_as_seed_user().await?;
    session.slow_down().await;

    shop.add_first_product_to_cart().await?;
    session.slow_down().await;

    shop.open_cart().await?;
    shop.proceed_to_checkout().await?;
    session.slow_down().await;
    Ok(())
}

/// Order the first product for [`DELIVERY_ROOM`]
pub async fn checkout(session: &Session) -> Result<()> {
    let shop = Storefront::new(session);
    reach_checkout(&shop).await?;

    shop.place_order(Some(DELIVERY_ROOM)).await?;
    session.wait_visible(&order_confirmed_heading()).await?;
    session.slow_down().await;

    // Confirmation renders in place; the route does not change
    shop.assert_url_contains(routes::CHECKOUT).await
}

/// Submit the order with an empty room; the order must not go through
pub async fn checkout_without_room(session: &Session) -> Result<()> {
    let shop = Storefront::new(session);
    reach_checkout(&shop).await?;

    shop.place_order(None).await?;

    let confirmed = Condition::Visible(order_confirmed_heading());
    match session.wait_until(&confirmed, session.policy().timeout).await {
        Ok(()) => Err(HarnessError::assertion(
            "order without room",
            "no confirmation",
            "\"Order Confirmed!\" is visible",
        )),
        Err(HarnessError::WaitTimeout { .. }) => {
            info!("Order was not placed without a room");
            shop.assert_url_contains(routes::CHECKOUT).await
        }
        Err(e) => Err(e),
    }
}

pub(super) fn checkout_boxed(session: &Session) -> LocalBoxFuture<'_, Result<()>> {
    Box::pin(checkout(session))
}

pub(super) fn checkout_without_room_boxed(session: &Session) -> LocalBoxFuture<'_, Result<()>> {
    Box::pin(checkout_without_room(session))
}
