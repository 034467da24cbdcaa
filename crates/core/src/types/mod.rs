//! Types mirroring the remote catalog API.

pub mod product;

pub use product::{Category, Product, ProductPage, Review};
