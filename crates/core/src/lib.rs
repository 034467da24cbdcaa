//! Tinyshop Core - Domain types and catalog browsing state.
//!
//! This crate contains the pieces of Tinyshop that do not touch the network:
//! - [`types`] - Product, review and category types mirroring the remote
//!   catalog API's JSON schema
//! - [`catalog`] - The catalog list controller: filter/sort/search state,
//!   page accumulation, and the `ProductSource` seam the storefront's HTTP
//!   client plugs into
//!
//! Keeping the controller here (no axum, no reqwest) means every pagination
//! and filtering rule can be unit tested against a scripted source.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod types;

pub use catalog::{CatalogList, FetchError, FetchMode, PAGE_SIZE, ProductSource, SortOrder};
pub use types::{Category, Product, ProductPage, Review};
