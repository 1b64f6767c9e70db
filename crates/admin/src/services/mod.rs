//! Business logic services for the configurator.
//!
//! # Services
//!
//! - `configurator` - Setup wizard orchestration over a product catalog
//! - `demo` - Demo catalog import for development stores
//! - `designs` - Design metaobjects, status workflow and notifications
//! - `email` - Email delivery via SMTP
//! - `fees` - Decoration fee lookup tables
//! - `fixtures` - Sample data for fixture mode
//! - `notifications` - Design status emails
//! - `orders` - Orders with design summaries and fulfillment
//! - `settings` - App settings stored in shop metafields
//! - `uploads` - Staged file uploads

pub mod configurator;
pub mod demo;
pub mod designs;
pub mod email;
pub mod fees;
pub mod fixtures;
pub mod notifications;
pub mod orders;
pub mod settings;
pub mod uploads;

pub use configurator::{
    ConfigureOutcome, ConfigureRequest, ProductCatalog, StoreOptionValues, WizardError,
    configure_product,
};
pub use designs::{Design, DesignService, NewDesign, Side, SideFiles};
pub use email::{EmailError, EmailService};
pub use notifications::{NotificationError, Notifier};
pub use settings::{AppSettings, SettingsStore};
pub use uploads::{FilePayload, UploadError};
