//! FormRelay Restore - Bringing prior input back after a round trip
//!
//! Composite-key selections (one logical row identity spread over N key
//! columns) are flattened to delimited strings for transport and expanded
//! back into ordinary per-key parameters on the next request, with the
//! valid-value set guarding against forged input.

pub mod composite;
pub mod prior;

pub use composite::*;
pub use prior::*;
