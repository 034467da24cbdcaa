//! Browse-session cookie middleware.
//!
//! The storefront keeps no account state; the only per-visitor state is the
//! catalog list in [`crate::browse::BrowseSessions`]. This middleware
//! assigns each visitor a UUID cookie and exposes it to handlers as a
//! request extension.

use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Browse session cookie name.
pub const BROWSE_COOKIE_NAME: &str = "tinyshop_browse";

/// The visitor id for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseSessionId(pub Uuid);

/// Middleware that assigns or restores the visitor's browse id.
///
/// A missing or unparseable cookie gets a fresh UUID, and the Set-Cookie
/// header is only emitted in that case.
pub async fn browse_session_middleware(mut request: Request, next: Next) -> Response {
    let existing = request
        .headers()
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(parse_browse_cookie);

    let (visitor, is_new) = match existing {
        Some(id) => (id, false),
        None => (Uuid::new_v4(), true),
    };

    request.extensions_mut().insert(BrowseSessionId(visitor));

    let mut response = next.run(request).await;

    if is_new {
        let cookie = format!("{BROWSE_COOKIE_NAME}={visitor}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

/// Extract the browse id from a Cookie header value.
fn parse_browse_cookie(cookies: &str) -> Option<Uuid> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == BROWSE_COOKIE_NAME)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
