//! Shared building blocks for the Grove registry.
//!
//! This crate has no internal dependencies so it can be used by the
//! storage layer, the registry engine, and any worker or CLI tooling.

pub mod crypto;
pub mod error;
pub mod types;
pub mod validation;
