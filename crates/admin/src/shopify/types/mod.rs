//! Domain types for Shopify Admin API.
//!
//! These types are shared by the GraphQL response shapes in
//! `admin::queries` and the JSON returned by our own handlers, so they use
//! Shopify's camelCase field names on both sides.

pub mod common;
pub mod file;
pub mod metafield;
pub mod metaobject;
pub mod order;
pub mod product;

pub use common::*;
pub use file::*;
pub use metafield::*;
pub use metaobject::*;
pub use order::*;
pub use product::*;
