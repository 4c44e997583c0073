//! Live storefront helpers
#![allow(dead_code)]

/// Check if a storefront is answering at `url`
pub async fn is_server_available(url: &str) -> bool {
    match reqwest::get(url).await {
        Ok(resp) => resp.status().is_success(),
        Err(_) => false,
    }
}

/// Macro to skip test if the storefront dev server isn't running
#[macro_export]
macro_rules! require_local_server {
    ($url:expr) => {{
        if !server::is_server_available($url).await {
            eprintln!("Skipping: storefront not running at {}", $url);
            eprintln!("  To run these tests, start the frontend and API with:");
            eprintln!("    npm run dev   (frontend, port 5173)");
            eprintln!("  and seed the demo shop user.");
            return;
        }
    }};
}
