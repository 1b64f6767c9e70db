//! Core types for Product Configurator.
//!
//! Type-safe wrappers for Shopify identifiers, customer emails, prices and
//! design review statuses.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use status::*;
