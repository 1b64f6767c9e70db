//! Product Configurator admin library.
//!
//! Embedded Shopify admin app that turns option lists into product variants,
//! plus the storefront app proxy customers use to save and approve custom
//! designs.
//!
//! # Security
//!
//! This crate holds the Shopify Admin API access token and the app's API
//! secret. Every embedded route requires a verified launch; every proxy route
//! requires a valid app proxy signature.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
