//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Patch structs for partial updates, built on [`field::Field`]
//! - Query parameter structs where the API filters listings

pub mod audit;
pub mod credential;
pub mod dataset;
pub mod datasource;
pub mod ecosystem;
pub mod field;
pub mod project;
pub mod user;
