//! FormRelay Display - Per-control visibility resolution
//!
//! Combines a configured default display method with an ordered list of
//! pluggable checkers into the tri-state decision every submit-capable
//! directive asks for before rendering.

pub mod checker;
pub mod resolver;

pub use checker::*;
pub use resolver::*;
