//! FormRelay Test Harness - Render-pass simulation and protocol validation
//!
//! This crate provides:
//! - A harness simulating the directive flow of one server render pass
//! - A simulated browser postback (activation + blob round trip)
//! - End-to-end integration tests across every FormRelay crate

pub mod harness;
pub mod integration;

pub use harness::*;
pub use integration::*;
