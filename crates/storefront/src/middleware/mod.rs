//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Browse session (visitor cookie for catalog state)

pub mod browse_session;
pub mod request_id;

pub use browse_session::{BROWSE_COOKIE_NAME, BrowseSessionId, browse_session_middleware};
pub use request_id::request_id_middleware;
