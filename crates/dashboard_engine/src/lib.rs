//! Dashboard core: aggregates financial records into chart series, resolves
//! the weighted layout tree into slots, and joins both into a dashboard view.

pub mod aggregate;
pub mod assemble;
pub mod layout;

pub use aggregate::aggregate;
pub use assemble::{AssembleOptions, assemble, write_view};
pub use layout::{find_slot, resolve_absolute, resolve_grid, resolve_proportional};
