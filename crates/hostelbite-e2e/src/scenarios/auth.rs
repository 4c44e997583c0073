use futures::future::LocalBoxFuture;
use tracing::info;

use crate::actions::{NewAccount, Storefront};
use crate::error::Result;
use crate::session::Session;

/// Register a fresh account and land on the products page
pub async fn register(session: &Session) -> Result<()> {
    let shop = Storefront::new(session);
    session.clear_session().await?;

    shop.open_register().await?;
    session.slow_down().await;

    let account = NewAccount::unique();
    info!("Registering {}", account.email);
    shop.register(&account).await?;

    shop.wait_for_products_page().await?;
    shop.assert_url_contains(crate::actions::routes::PRODUCTS).await
}

/// Sign in with the seed credentials
pub async fn login(session: &Session) -> Result<()> {
    let shop = Storefront::new(session);
    session.clear_session().await?;

    shop.login_as_seed_user().await?;
    session.slow_down().await;
    shop.assert_url_contains(crate::actions::routes::PRODUCTS).await
}

pub(super) fn register_boxed(session: &Session) -> LocalBoxFuture<'_, Result<()>> {
    Box::pin(register(session))
}

pub(super) fn login_boxed(session: &Session) -> LocalBoxFuture<'_, Result<()>> {
    Box::pin(login(session))
}
