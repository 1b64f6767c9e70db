//! Product Configurator Core - variant generation and shared types.
//!
//! This crate holds the pieces of the configurator that do not talk to
//! anything: the admin server and the CLI build on top of it.
//!
//! # Architecture
//!
//! No I/O, no database access, no HTTP clients. The optional `postgres`
//! feature only adds `sqlx` type mappings for the status enums.
//!
//! # Modules
//!
//! - [`variants`] - Cartesian variant generation and duplicate filtering
//! - [`suggestions`] - Option autocomplete suggestion filter
//! - [`wizard`] - Setup wizard step validation
//! - [`types`] - Shopify GIDs, emails, prices and the design status machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod suggestions;
pub mod types;
pub mod variants;
pub mod wizard;

pub use suggestions::{Suggestion, SuggestionKind, filter_suggestions};
pub use types::*;
pub use variants::{
    Axis, CandidateVariant, GenerationResult, OptionSet, OptionValue, VariantSignature,
    filter_duplicates, generate_combinations,
};
pub use wizard::{
    Severity, UploadedView, ValidationIssue, View, WizardInput, combination_count,
    combination_warning, validate_step, validate_wizard,
};
