//! Request handlers, one module per resource.

pub mod audit;
pub mod credentials;
pub mod datasets;
pub mod ecosystems;
pub mod projects;
pub mod users;
