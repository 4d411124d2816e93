//! Credential operations.
//!
//! Tokens are sealed before they reach the store and are never written
//! to the audit trail; operation args carry only the credential's
//! metadata.

use grove_core::crypto::TokenCipher;
use grove_core::error::CoreError;
use grove_core::types::DbId;
use grove_core::validation::validate_field;
use grove_db::models::audit::OpType;
use grove_db::models::credential::Credential;
use grove_db::repositories::{CredentialRepo, DataSourceTypeRepo};
use grove_db::DbPool;
use serde_json::json;

use crate::context::RegistryContext;
use crate::error::Error;
use crate::log::TransactionsLog;

/// Store a sealed credential token for the calling user.
pub async fn add_credential(
    pool: &DbPool,
    ctx: &RegistryContext,
    cipher: &TokenCipher,
    name: &str,
    datasource_type: &str,
    token: &str,
) -> Result<Credential, Error> {
    validate_field("name", Some(name), false)?;
    validate_field("token", Some(token), false)?;

    let sealed = cipher.encrypt(token.as_bytes())?;

    let mut tx = pool.begin().await.map_err(Error::from)?;

    let ds_type = DataSourceTypeRepo::find_by_name(&mut tx, datasource_type)
        .await?
        .ok_or_else(|| {
            CoreError::not_found(format!("Datasource type '{datasource_type}'"))
        })?;

    let log = TransactionsLog::open(&mut tx, "add_credential", ctx).await?;
    let args = json!({
        "user_id": ctx.user_id,
        "name": name,
        "datasource_type": datasource_type,
    });

    let credential =
        CredentialRepo::insert(&mut tx, ctx.user_id, name, ds_type.id, &sealed).await?;
    log.log_operation(&mut tx, OpType::Add, "credential", name, args)
        .await?;
    log.close(&mut tx).await?;

    tx.commit().await.map_err(Error::from)?;
    tracing::info!(id = credential.id, user_id = ctx.user_id, name, "credential added");
    Ok(credential)
}

/// Remove a credential owned by the calling user. Returns the row as
/// it was before deletion.
pub async fn delete_credential(
    pool: &DbPool,
    ctx: &RegistryContext,
    id: DbId,
) -> Result<Credential, Error> {
    let mut tx = pool.begin().await.map_err(Error::from)?;

    let credential = CredentialRepo::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Credential ID {id}")))?;

    if credential.user_id != ctx.user_id {
        return Err(CoreError::PermissionDenied(format!(
            "user '{}' cannot delete credentials owned by another user",
            ctx.username
        ))
        .into());
    }

    let log = TransactionsLog::open(&mut tx, "delete_credential", ctx).await?;

    CredentialRepo::delete(&mut tx, id).await?;
    log.log_operation(
        &mut tx,
        OpType::Delete,
        "credential",
        &id.to_string(),
        json!({ "id": id }),
    )
    .await?;
    log.close(&mut tx).await?;

    tx.commit().await.map_err(Error::from)?;
    tracing::info!(id, user_id = ctx.user_id, "credential deleted");
    Ok(credential)
}
