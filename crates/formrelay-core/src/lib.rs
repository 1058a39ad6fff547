//! FormRelay Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout FormRelay:
//! - Operation identifiers (RequestId) and URI extraction
//! - Submit actions and display methods
//! - Element attribute bags
//! - Submission records and per-form aggregation
//! - Request-scoped storage for one render pass

pub mod action;
pub mod attrs;
pub mod context;
pub mod error;
pub mod id;
pub mod scope;
pub mod submission;

pub use action::*;
pub use attrs::*;
pub use context::*;
pub use error::*;
pub use id::*;
pub use scope::*;
pub use submission::*;
