//! Engine error type and store error translation.

use std::sync::OnceLock;

use grove_core::error::CoreError;
use regex::Regex;
use thiserror::Error;

/// Error returned by engine calls.
#[derive(Debug, Error)]
pub enum Error {
    /// Domain error: validation failure, missing entity, duplicate,
    /// or permission denial.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Unexpected store failure.
    #[error("storage error: {0}")]
    Storage(sqlx::Error),
}

/// Postgres error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for Error {
    /// Translate unique violations into domain duplicates so callers
    /// see which entity clashed instead of a raw store error.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let entity = db_err
                    .constraint()
                    .and_then(entity_for_constraint)
                    .unwrap_or("entity");
                let value = db_err
                    .try_downcast_ref::<sqlx::postgres::PgDatabaseError>()
                    .and_then(|pg| pg.detail())
                    .and_then(parse_duplicate_value)
                    .unwrap_or_default();
                return Error::Core(CoreError::AlreadyExists { entity, value });
            }
        }
        Error::Storage(err)
    }
}

/// Map a unique constraint name to the entity it guards.
fn entity_for_constraint(constraint: &str) -> Option<&'static str> {
    match constraint {
        "uq_ecosystems_name" => Some("ecosystem"),
        "uq_projects_name" => Some("project"),
        "uq_datasources_type_uri" => Some("datasource"),
        "uq_datasets_view" => Some("dataset"),
        "uq_credentials_user_name" | "uq_credentials_user_type" => Some("credential"),
        "uq_users_username" => Some("user"),
        _ => None,
    }
}

/// Pull the duplicated value out of a Postgres unique violation detail
/// message, e.g. `Key (name)=(sigtools) already exists.`.
///
/// Composite keys yield the comma-separated value tuple.
fn parse_duplicate_value(detail: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"Key \([^)]+\)=\((?P<value>.+)\) already exists")
            .unwrap_or_else(|_| unreachable!())
    });
    re.captures(detail)
        .map(|caps| caps["value"].to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
