//! # Config Loader
//!
//! Loads the two static inputs of the dashboard:
//!
//! - the dashboard XML document (`Dashboard/Items` and `Dashboard/LayoutTree`),
//!   converted into a typed [`models::DashboardConfig`] at the boundary;
//! - the JSON file of financial records.
//!
//! Only I/O and structurally invalid documents are errors. Per-item gaps
//! (missing weights, unknown orientations or series types) fall back to defaults.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! let config = config_loader::load_dashboard("public/data.xml")?;
//! let records = config_loader::load_records("public/records.json")?;
//! println!("{} items, {} records", config.items.len(), records.len());
//! # Ok::<(), config_loader::ConfigError>(())
//! ```

pub mod dashboard;
pub mod error;
pub mod records;

pub use dashboard::{load_dashboard, parse_dashboard};
pub use error::{ConfigError, Result};
pub use records::{load_records, parse_records};
