//! Storefront page actions
//!
//! Each action navigates or interacts, then waits for a visible marker that
//! proves the page reached the expected state. Actions hold no state beyond
//! a borrowed [`Session`], so repeating one cannot corrupt the harness.

use tracing::{info, instrument};

use crate::error::{HarnessError, Result};
use crate::locator::Locator;
use crate::session::Session;
use crate::wait::Condition;

/// Storefront routes
pub mod routes {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const PRODUCTS: &str = "/products";
    pub const CART: &str = "/cart";
    pub const CHECKOUT: &str = "/checkout";
}

/// Placeholder of the product search box
pub const SEARCH_PLACEHOLDER: &str = "Search products...";

/// Label on the per-item cart removal control
pub const REMOVE_ITEM_LABEL: &str = "Remove item";

pub fn search_input() -> Locator {
    Locator::css(format!("input[placeholder='{}']", SEARCH_PLACEHOLDER))
}

pub fn remove_item_buttons() -> Locator {
    Locator::css(format!("button[aria-label='{}']", REMOVE_ITEM_LABEL))
}

pub fn products_heading() -> Locator {
    Locator::h1("Browse Menu")
}

pub fn cart_heading() -> Locator {
    Locator::h1("Your Cart")
}

pub fn checkout_heading() -> Locator {
    Locator::h1("Checkout")
}

pub fn order_confirmed_heading() -> Locator {
    Locator::h1("Order Confirmed!")
}

/// First product card's "Add" button
pub fn first_add_button() -> Locator {
    Locator::xpath("(//button[normalize-space()='Add'])[1]")
}

/// Details for a new storefront account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub room: String,
    pub password: String,
}

impl NewAccount {
    /// A throwaway account with a unique email
    pub fn unique() -> Self {
        Self {
            name: "E2E User".to_string(),
            email: unique_email(),
            phone: "9876543210".to_string(),
            room: "A-101".to_string(),
            password: "Pass1234".to_string(),
        }
    }
}

/// `e2e+<uuid>@hostelbite.test`
pub fn unique_email() -> String {
    format!("e2e+{}@hostelbite.test", uuid::Uuid::new_v4())
}

/// Reusable storefront interactions on top of a session
#[derive(Clone, Copy)]
pub struct Storefront<'s> {
    session: &'s Session,
}

impl<'s> Storefront<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &'s Session {
        self.session
    }

    /// Open the login page and wait for the email field
    #[instrument(skip(self))]
    pub async fn open_login(&self) -> Result<()> {
        self.session.navigate(routes::LOGIN).await?;
        self.session.wait_visible(&Locator::id("email")).await
    }

    /// Open the register page and wait for the name field
    #[instrument(skip(self))]
    pub async fn open_register(&self) -> Result<()> {
        self.session.navigate(routes::REGISTER).await?;
        self.session.wait_visible(&Locator::id("name")).await
    }

    /// Wait until `<button>` labelled `text` is clickable
    pub async fn submit_button_by_text(&self, text: &str) -> Result<Locator> {
        let button = Locator::button(text);
        self.session.wait_clickable(&button).await?;
        Ok(button)
    }

    /// Fill the login form and press "Sign In"
    ///
    /// Expects the login form to be visible already.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        self.session.type_text(&Locator::id("email"), email).await?;
        self.session
            .type_text(&Locator::id("password"), password)
            .await?;
        let submit = self.submit_button_by_text("Sign In").await?;
        self.session.click(&submit).await
    }

    /// Log in with the seed credentials and wait for the products page
    #[instrument(skip(self))]
    pub async fn login_as_seed_user(&self) -> Result<()> {
        let config = self.session.config();
        self.open_login().await?;
        self.login(&config.seed_email, &config.seed_password).await?;
        self.wait_for_products_page().await
    }

    /// Fill the register form and press "Create Account"
    ///
    /// Expects the register form to be visible already.
    #[instrument(skip(self, account), fields(email = %account.email))]
    pub async fn register(&self, account: &NewAccount) -> Result<()> {
        let fields = [
            ("name", &account.name),
            ("email", &account.email),
            ("phone", &account.phone),
            ("room", &account.room),
            ("password", &account.password),
        ];
        for (id, value) in fields {
            self.session.type_text(&Locator::id(id), value).await?;
        }
        let submit = self.submit_button_by_text("Create Account").await?;
        self.session.click(&submit).await
    }

    /// Wait for the products route and its "Browse Menu" heading
    #[instrument(skip(self))]
    pub async fn wait_for_products_page(&self) -> Result<()> {
        self.session
            .wait_for(&Condition::UrlContains(routes::PRODUCTS.to_string()))
            .await?;
        self.session.wait_visible(&products_heading()).await
    }

    /// Click the first product's "Add" button
    #[instrument(skip(self))]
    pub async fn add_first_product_to_cart(&self) -> Result<()> {
        self.wait_for_products_page().await?;
        info!("Adding first product to cart");
        self.session.click(&first_add_button()).await
    }

    /// Open the cart and wait for its heading
    #[instrument(skip(self))]
    pub async fn open_cart(&self) -> Result<()> {
        self.session.navigate(routes::CART).await?;
        self.session.wait_visible(&cart_heading()).await
    }

    /// Follow "Proceed to Checkout" and wait for the checkout heading
    #[instrument(skip(self))]
    pub async fn proceed_to_checkout(&self) -> Result<()> {
        self.session
            .click(&Locator::link("Proceed to Checkout"))
            .await?;
        self.session.wait_visible(&checkout_heading()).await
    }

    /// Set the delivery room (clearing any prefilled value) and place the order
    ///
    /// `None` leaves the room empty.
    #[instrument(skip(self))]
    pub async fn place_order(&self, room: Option<&str>) -> Result<()> {
        let room_input = Locator::id("room");
        self.session.wait_visible(&room_input).await?;
        self.session.scroll_into_view(&room_input).await?;
        self.session.clear_input(&room_input).await?;
        self.session
            .wait_for(&Condition::ValueEmpty(room_input.clone()))
            .await?;
        if let Some(room) = room {
            self.session.type_text(&room_input, room).await?;
        }

        let submit = self.submit_button_by_text("Place Order").await?;
        self.session.click(&submit).await
    }

    /// Type a search term into the product search box
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<()> {
        let input = search_input();
        self.session.wait_visible(&input).await?;
        self.session.type_text(&input, term).await
    }

    /// Empty the search box and wait until the page sees it empty
    #[instrument(skip(self))]
    pub async fn clear_search(&self) -> Result<()> {
        let input = search_input();
        self.session.clear_input(&input).await?;
        self.session.wait_for(&Condition::ValueEmpty(input)).await
    }

    /// Click the filter button labelled `primary`, or `fallback` when the
    /// primary label is not on the page
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::ElementNotFound`] when neither label exists.
    #[instrument(skip(self))]
    pub async fn click_filter(&self, primary: &str, fallback: &str) -> Result<()> {
        let primary_button = Locator::button(primary);
        if self.session.exists(&primary_button).await? {
            return self.session.click(&primary_button).await;
        }

        let fallback_button = Locator::button(fallback);
        if self.session.exists(&fallback_button).await? {
            info!("Filter '{}' not present, using '{}'", primary, fallback);
            return self.session.click(&fallback_button).await;
        }

        Err(HarnessError::ElementNotFound {
            locator: format!("{} or {}", primary_button, fallback_button),
            elapsed: self.session.policy().implicit_wait * 2,
        })
    }

    /// Fail unless the current URL contains `fragment`
    pub async fn assert_url_contains(&self, fragment: &str) -> Result<()> {
        let url = self.session.current_url().await?;
        if url.contains(fragment) {
            Ok(())
        } else {
            Err(HarnessError::assertion(
                "current url",
                format!("contains '{}'", fragment),
                url,
            ))
        }
    }
}
