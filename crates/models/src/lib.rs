//! Shared data types for the dashboard: input records, aggregate outputs,
//! the layout tree with its resolved slots, and the typed dashboard configuration.

pub mod dashboard;
pub mod layout;
pub mod records;

pub use dashboard::*;
pub use layout::*;
pub use records::*;
