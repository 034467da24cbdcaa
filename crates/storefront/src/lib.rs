//! Tinyshop Storefront library.
//!
//! The storefront as a library, so handlers, the catalog client and the
//! browse-session plumbing can be unit tested without spawning the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod browse;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;
