//! Domain models for the configurator admin.

pub mod customer_design;
pub mod session;

pub use customer_design::{
    CustomerDesign, CustomerDesignFilter, CustomerDesignUpdate, DesignFiles, NewCustomerDesign,
    generate_design_id,
};
pub use session::{CurrentShop, keys as session_keys};
