//! In-process mock of the HostelBite storefront
//!
//! Serves one page for every route; an inline script renders the view for
//! `location.pathname`. The DOM follows the real application's contract:
//! routes, element ids, button labels, `aria-label`s and storage keys. The
//! login API also sets a cookie so cookie clearing is observable.
#![allow(dead_code)]

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use hostelbite_e2e::config::{DEFAULT_SEED_EMAIL, DEFAULT_SEED_PASSWORD};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Room the seed user's profile carries
pub const SEED_ROOM: &str = "B-204";

/// Name of the session cookie set at login
pub const SESSION_COOKIE: &str = "hostelbite_sid";

/// Label of the drink category filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrinkFilter {
    Drink,
    Beverages,
    /// No drink filter at all
    Missing,
}

struct MockState {
    filter: DrinkFilter,
    users: Mutex<HashMap<String, (String, Value)>>,
}

/// A running mock storefront; shut down on drop
pub struct MockStorefront {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl MockStorefront {
    pub async fn start() -> Self {
        Self::with_drink_filter(DrinkFilter::Drink).await
    }

    pub async fn with_drink_filter(filter: DrinkFilter) -> Self {
        let mut users = HashMap::new();
        users.insert(
            DEFAULT_SEED_EMAIL.to_string(),
            (
                DEFAULT_SEED_PASSWORD.to_string(),
                json!({ "name": "Seed Shopper", "email": DEFAULT_SEED_EMAIL, "room": SEED_ROOM }),
            ),
        );
        let state = Arc::new(MockState {
            filter,
            users: Mutex::new(users),
        });

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .fallback(page)
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Should bind mock storefront");
        let addr = listener.local_addr().expect("Should have local address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock storefront should serve");
        });

        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for MockStorefront {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct Registration {
    name: String,
    email: String,
    phone: String,
    room: String,
    password: String,
}

fn signed_in(user: Value) -> Response {
    let token = format!("mock-{}", uuid::Uuid::new_v4());
    (
        [(
            header::SET_COOKIE,
            format!("{}={}; Path=/; SameSite=Lax", SESSION_COOKIE, token),
        )],
        Json(json!({ "token": token, "user": user })),
    )
        .into_response()
}

async fn login(State(state): State<Arc<MockState>>, Json(creds): Json<Credentials>) -> Response {
    let user = {
        let users = state.users.lock().expect("users lock");
        users
            .get(&creds.email)
            .filter(|(password, _)| *password == creds.password)
            .map(|(_, user)| user.clone())
    };
    match user {
        Some(user) => signed_in(user),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid email or password" })),
        )
            .into_response(),
    }
}

async fn register(State(state): State<Arc<MockState>>, Json(form): Json<Registration>) -> Response {
    if form.phone.len() != 10 || form.password.len() < 6 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid registration" })),
        )
            .into_response();
    }

    let user = json!({ "name": form.name, "email": form.email, "room": form.room });
    {
        let mut users = state.users.lock().expect("users lock");
        if users.contains_key(&form.email) {
            return (
                StatusCode::CONFLICT,
                Json(json!({ "error": "Email already registered" })),
            )
                .into_response();
        }
        users.insert(form.email.clone(), (form.password, user.clone()));
    }
    signed_in(user)
}

async fn page(State(state): State<Arc<MockState>>) -> Html<String> {
    let filters = match state.filter {
        DrinkFilter::Drink => r#"[["All", null], ["Snacks", "snack"], ["Drink", "drink"]]"#,
        DrinkFilter::Beverages => r#"[["All", null], ["Snacks", "snack"], ["Beverages", "drink"]]"#,
        DrinkFilter::Missing => r#"[["All", null], ["Snacks", "snack"]]"#,
    };
    Html(PAGE.replace("__FILTERS__", filters))
}

const PAGE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>HostelBite</title>
<style>
  body { font-family: sans-serif; margin: 2rem; }
  input, button, a { display: block; margin: 0.5rem 0; }
  .toast { color: #b91c1c; min-height: 1rem; }
</style>
</head>
<body>
<div id="app"></div>
<script>
const FILTERS = __FILTERS__;
const PRODUCTS = [
  { id: 1, name: 'Oreo Original', category: 'snack' },
  { id: 2, name: "Lay's Classic Salted", category: 'snack' },
  { id: 3, name: 'Coca-Cola', category: 'drink' },
  { id: 4, name: 'Sprite', category: 'drink' },
];
const KEYS = { token: 'hostelbite_token', user: 'hostelbite_user', cart: 'hostelbite_cart' };
const app = document.getElementById('app');

const load = (key, fallback) => {
  try { return JSON.parse(localStorage.getItem(key)) ?? fallback; } catch (e) { return fallback; }
};
const save = (key, value) => localStorage.setItem(key, JSON.stringify(value));
const go = (path) => window.location.assign(path);

function el(tag, attrs, ...children) {
  const node = document.createElement(tag);
  for (const [key, value] of Object.entries(attrs || {})) {
    if (key.startsWith('on')) node.addEventListener(key.slice(2), value);
    else node.setAttribute(key, value);
  }
  node.append(...children);
  return node;
}

async function authenticate(url, body, toast) {
  const res = await fetch(url, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
  const payload = await res.json();
  if (!res.ok) { toast.textContent = payload.error; return; }
  localStorage.setItem(KEYS.token, payload.token);
  save(KEYS.user, payload.user);
  go('/products');
}

function loginPage() {
  const toast = el('p', { class: 'toast' });
  const email = el('input', { id: 'email', type: 'email' });
  const password = el('input', { id: 'password', type: 'password' });
  const submit = el('button', {
    type: 'button',
    onclick: () => authenticate('/api/auth/login', { email: email.value, password: password.value }, toast),
  }, 'Sign In');
  app.append(el('h1', {}, 'Welcome back'), email, password, submit, toast,
    el('a', { href: '/auth/register' }, 'Create an account'));
}

function registerPage() {
  const toast = el('p', { class: 'toast' });
  const fields = ['name', 'email', 'phone', 'room', 'password'].map((id) =>
    el('input', { id, type: id === 'password' ? 'password' : 'text' }));
  const submit = el('button', {
    type: 'button',
    onclick: () => authenticate('/api/auth/register',
      Object.fromEntries(fields.map((f) => [f.id, f.value])), toast),
  }, 'Create Account');
  app.append(el('h1', {}, 'Join HostelBite'), ...fields, submit, toast);
}

function requireToken() {
  if (localStorage.getItem(KEYS.token)) return true;
  go('/auth/login');
  return false;
}

function addToCart(product) {
  const cart = load(KEYS.cart, []);
  const line = cart.find((item) => item.id === product.id);
  if (line) line.qty += 1; else cart.push({ id: product.id, name: product.name, qty: 1 });
  save(KEYS.cart, cart);
}

function productsPage() {
  if (!requireToken()) return;
  let term = '';
  let category = null;
  const grid = el('div', { id: 'products' });
  const render = () => grid.replaceChildren(...PRODUCTS
    .filter((p) => p.name.toLowerCase().includes(term.toLowerCase()))
    .filter((p) => !category || p.category === category)
    .map((p) => el('div', { class: 'card' },
      el('h3', {}, p.name),
      el('button', { type: 'button', onclick: () => addToCart(p) }, 'Add'))));
  const search = el('input', {
    placeholder: 'Search products...',
    oninput: (e) => { term = e.target.value; render(); },
  });
  const filters = el('div', {}, ...FILTERS.map(([label, value]) =>
    el('button', { type: 'button', onclick: () => { category = value; render(); } }, label)));
  app.append(el('h1', {}, 'Browse Menu'), search, filters, grid);
  render();
}

function cartPage() {
  if (!requireToken()) return;
  const items = el('ul');
  const render = () => items.replaceChildren(...load(KEYS.cart, []).map((item) =>
    el('li', {}, `${item.name} x${item.qty}`,
      el('button', {
        type: 'button',
        'aria-label': 'Remove item',
        onclick: () => { save(KEYS.cart, load(KEYS.cart, []).filter((i) => i.id !== item.id)); render(); },
      }, 'x'))));
  app.append(el('h1', {}, 'Your Cart'), items, el('a', { href: '/checkout' }, 'Proceed to Checkout'));
  render();
}

function checkoutPage() {
  if (!requireToken()) return;
  const user = load(KEYS.user, {});
  const toast = el('p', { class: 'toast' });
  const room = el('input', { id: 'room' });
  room.value = user.room || '';
  const submit = el('button', {
    type: 'button',
    onclick: () => {
      if (!room.value.trim()) { toast.textContent = 'Please enter your room number'; return; }
      if (load(KEYS.cart, []).length === 0) { toast.textContent = 'Your cart is empty'; return; }
      localStorage.removeItem(KEYS.cart);
      submit.disabled = true;
      app.prepend(el('h1', {}, 'Order Confirmed!'), el('p', {}, `Delivering to room ${room.value}`));
    },
  }, 'Place Order');
  app.append(el('h1', {}, 'Checkout'), room, submit, toast);
}

const ROUTES = {
  '/auth/login': loginPage,
  '/auth/register': registerPage,
  '/products': productsPage,
  '/cart': cartPage,
  '/checkout': checkoutPage,
};
(ROUTES[window.location.pathname] || (() => go('/products')))();
</script>
</body>
</html>
"#;
