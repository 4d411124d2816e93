//! HTTP presentation layer for the Grove registry.

pub mod caller;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;
