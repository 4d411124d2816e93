//! Ecosystem operations.

use grove_core::error::CoreError;
use grove_core::types::DbId;
use grove_core::validation::{validate_field, validate_name};
use grove_db::models::audit::OpType;
use grove_db::models::ecosystem::{Ecosystem, EcosystemPatch};
use grove_db::repositories::EcosystemRepo;
use grove_db::DbPool;
use serde_json::json;

use crate::context::RegistryContext;
use crate::engine::{raw_patch_value, to_none_if_empty};
use crate::error::Error;
use crate::log::TransactionsLog;

use grove_db::models::field::Field;

/// Add a new ecosystem to the registry.
pub async fn add_ecosystem(
    pool: &DbPool,
    ctx: &RegistryContext,
    name: &str,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<Ecosystem, Error> {
    validate_name(Some(name))?;
    validate_field("title", title, true)?;
    validate_field("description", description, true)?;

    let mut tx = pool.begin().await.map_err(Error::from)?;

    let log = TransactionsLog::open(&mut tx, "add_ecosystem", ctx).await?;
    let args = json!({
        "name": name,
        "title": title,
        "description": description,
    });

    let ecosystem = EcosystemRepo::insert(&mut tx, name, title, description).await?;
    log.log_operation(&mut tx, OpType::Add, "ecosystem", name, args)
        .await?;
    log.close(&mut tx).await?;

    tx.commit().await.map_err(Error::from)?;
    tracing::info!(id = ecosystem.id, name, "ecosystem added");
    Ok(ecosystem)
}

/// Update an ecosystem. Fields absent from the patch keep their value;
/// `title` and `description` can be cleared with a null or an empty
/// string.
pub async fn update_ecosystem(
    pool: &DbPool,
    ctx: &RegistryContext,
    id: DbId,
    patch: &EcosystemPatch,
) -> Result<Ecosystem, Error> {
    if !patch.name.is_mentioned() && !patch.title.is_mentioned() && !patch.description.is_mentioned()
    {
        return Err(CoreError::invalid("there are no fields to update").into());
    }

    let name = match &patch.name {
        Field::Unset => None,
        Field::Null => return Err(CoreError::invalid("'name' cannot be None").into()),
        Field::Set(v) => {
            validate_name(Some(v))?;
            Some(v.clone())
        }
    };
    let title = resolve_clearable("title", &patch.title)?;
    let description = resolve_clearable("description", &patch.description)?;

    let mut tx = pool.begin().await.map_err(Error::from)?;

    let current = EcosystemRepo::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Ecosystem ID {id}")))?;

    let log = TransactionsLog::open(&mut tx, "update_ecosystem", ctx).await?;

    // The audit row records the arguments as the caller sent them,
    // never the normalized values written to the store.
    let mut args = serde_json::Map::new();
    args.insert("id".to_string(), json!(id));
    if patch.name.is_mentioned() {
        args.insert("name".to_string(), raw_patch_value(&patch.name));
    }
    if patch.title.is_mentioned() {
        args.insert("title".to_string(), raw_patch_value(&patch.title));
    }
    if patch.description.is_mentioned() {
        args.insert("description".to_string(), raw_patch_value(&patch.description));
    }

    let updated = EcosystemRepo::update(
        &mut tx,
        id,
        name.as_deref().unwrap_or(&current.name),
        if patch.title.is_mentioned() {
            title.as_deref()
        } else {
            current.title.as_deref()
        },
        if patch.description.is_mentioned() {
            description.as_deref()
        } else {
            current.description.as_deref()
        },
    )
    .await?;

    log.log_operation(
        &mut tx,
        OpType::Update,
        "ecosystem",
        &id.to_string(),
        serde_json::Value::Object(args),
    )
    .await?;
    log.close(&mut tx).await?;

    tx.commit().await.map_err(Error::from)?;
    tracing::info!(id, "ecosystem updated");
    Ok(updated)
}

/// Remove an ecosystem with all its projects and data sets. Returns
/// the row as it was before deletion.
pub async fn delete_ecosystem(
    pool: &DbPool,
    ctx: &RegistryContext,
    id: DbId,
) -> Result<Ecosystem, Error> {
    let mut tx = pool.begin().await.map_err(Error::from)?;

    let ecosystem = EcosystemRepo::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Ecosystem ID {id}")))?;

    let log = TransactionsLog::open(&mut tx, "delete_ecosystem", ctx).await?;

    EcosystemRepo::delete(&mut tx, id).await?;
    log.log_operation(
        &mut tx,
        OpType::Delete,
        "ecosystem",
        &id.to_string(),
        json!({ "id": id }),
    )
    .await?;
    log.close(&mut tx).await?;

    tx.commit().await.map_err(Error::from)?;
    tracing::info!(id, name = %ecosystem.name, "ecosystem deleted");
    Ok(ecosystem)
}

/// Resolve a clearable patch field: null clears it, an empty string
/// clears it too, any other value must pass field validation.
fn resolve_clearable(
    field_name: &str,
    field: &Field<String>,
) -> Result<Option<String>, Error> {
    match field {
        Field::Unset | Field::Null => Ok(None),
        Field::Set(v) => {
            let value = to_none_if_empty(Some(v.clone()));
            validate_field(field_name, value.as_deref(), true)?;
            Ok(value)
        }
    }
}
