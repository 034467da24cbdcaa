//! Integration tests for Tinyshop.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the storefront
//! cargo run -p tinyshop-storefront
//!
//! # Run the ignored end-to-end tests against it
//! cargo test -p tinyshop-integration-tests -- --ignored
//! ```
//!
//! The tests exercise a running storefront over HTTP, which in turn talks
//! to the live remote catalog API. They are `#[ignore]`d by default so the
//! regular test run stays hermetic.

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}
