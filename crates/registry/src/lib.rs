//! Transactional registry engine.
//!
//! Every mutating call validates its inputs first, then runs inside a
//! single store transaction that writes both the entity change and its
//! audit trail (a transaction row plus one operation row per entity
//! write). A rejected call leaves no trace in the audit log.

pub mod context;
pub mod engine;
pub mod error;
pub mod log;

pub use context::RegistryContext;
pub use error::Error;
pub use log::TransactionsLog;
