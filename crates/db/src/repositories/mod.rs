//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Methods take `&mut PgConnection` as the first argument so the
//! registry engine can run several of them inside one transaction;
//! pure read paths used by the API also accept a pool-backed
//! connection the same way.

pub mod credential_repo;
pub mod dataset_repo;
pub mod datasource_repo;
pub mod ecosystem_repo;
pub mod operation_repo;
pub mod project_repo;
pub mod transaction_repo;
pub mod user_repo;

pub use credential_repo::CredentialRepo;
pub use dataset_repo::DataSetRepo;
pub use datasource_repo::{DataSourceRepo, DataSourceTypeRepo};
pub use ecosystem_repo::EcosystemRepo;
pub use operation_repo::OperationRepo;
pub use project_repo::ProjectRepo;
pub use transaction_repo::TransactionRepo;
pub use user_repo::UserRepo;
