//! Shared HTTP Client Module
//!
//! Provides a global, lazy-initialized HTTP client so connections and TLS
//! sessions are reused across proposal requests.

use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// Global HTTP client for Anthropic API calls
///
/// Per-request timeouts come from `RenamerConfig`; this is the upper bound.
pub static ANTHROPIC_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(300))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .build()
        .expect("Failed to create Anthropic HTTP client")
});

/// Get the global Anthropic HTTP client
#[inline]
pub fn anthropic_client() -> &'static Client {
    &ANTHROPIC_CLIENT
}
