//! Data set operations.
//!
//! Data sources are managed implicitly: adding a data set creates its
//! data source on first use, and deleting the last data set of a data
//! source removes the data source too. Both sides are recorded in the
//! audit trail.

use grove_core::error::CoreError;
use grove_core::types::DbId;
use grove_core::validation::validate_field;
use grove_db::models::audit::OpType;
use grove_db::models::dataset::{DataSet, DataSetInput, DataSetPatch};
use grove_db::models::field::Field;
use grove_db::repositories::{DataSetRepo, DataSourceRepo, DataSourceTypeRepo, ProjectRepo};
use grove_db::DbPool;
use serde_json::json;

use crate::context::RegistryContext;
use crate::engine::canonical_filters;
use crate::error::Error;
use crate::log::TransactionsLog;

/// Add a data set to a project, creating its data source on first use.
pub async fn add_dataset(
    pool: &DbPool,
    ctx: &RegistryContext,
    project_id: DbId,
    datasource_type: &str,
    uri: &str,
    category: &str,
    filters: &serde_json::Value,
) -> Result<DataSet, Error> {
    validate_field("uri", Some(uri), false)?;
    validate_field("category", Some(category), false)?;
    let filters_text = canonical_filters(filters)?;

    let mut tx = pool.begin().await.map_err(Error::from)?;

    ProjectRepo::find_by_id(&mut tx, project_id)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Project ID {project_id}")))?;
    let ds_type = DataSourceTypeRepo::find_by_name(&mut tx, datasource_type)
        .await?
        .ok_or_else(|| {
            CoreError::not_found(format!("Datasource type '{datasource_type}'"))
        })?;

    let log = TransactionsLog::open(&mut tx, "add_dataset", ctx).await?;

    let datasource =
        match DataSourceRepo::find_by_type_and_uri(&mut tx, ds_type.id, uri).await? {
            Some(existing) => existing,
            None => {
                let created = DataSourceRepo::insert(&mut tx, ds_type.id, uri).await?;
                log.log_operation(
                    &mut tx,
                    OpType::Add,
                    "datasource",
                    uri,
                    json!({ "type": datasource_type, "uri": uri }),
                )
                .await?;
                created
            }
        };

    let args = json!({
        "project_id": project_id,
        "datasource_type": datasource_type,
        "uri": uri,
        "category": category,
        "filters": filters,
    });

    let dataset =
        DataSetRepo::insert(&mut tx, project_id, datasource.id, category, &filters_text).await?;
    log.log_operation(
        &mut tx,
        OpType::Add,
        "dataset",
        &project_id.to_string(),
        args,
    )
    .await?;
    log.close(&mut tx).await?;

    tx.commit().await.map_err(Error::from)?;
    tracing::info!(id = dataset.id, project_id, uri, category, "dataset added");
    Ok(dataset)
}

/// Add a batch of data sets of one data source type to a project.
///
/// Each item runs in its own transaction, so earlier successes stay
/// committed when a later item fails. When any item fails, the last
/// error is returned after the whole batch has been attempted.
pub async fn add_datasets(
    pool: &DbPool,
    ctx: &RegistryContext,
    project_id: DbId,
    datasource_type: &str,
    items: &[DataSetInput],
) -> Result<Vec<DataSet>, Error> {
    let mut created = Vec::with_capacity(items.len());
    let mut last_error = None;

    for item in items {
        match add_dataset(
            pool,
            ctx,
            project_id,
            datasource_type,
            &item.uri,
            &item.category,
            &item.filters,
        )
        .await
        {
            Ok(dataset) => created.push(dataset),
            Err(err) => {
                tracing::warn!(project_id, uri = %item.uri, error = %err, "dataset skipped");
                last_error = Some(err);
            }
        }
    }

    match last_error {
        Some(err) => Err(err),
        None => Ok(created),
    }
}

/// Update a data set's category or filters.
pub async fn update_dataset(
    pool: &DbPool,
    ctx: &RegistryContext,
    id: DbId,
    patch: &DataSetPatch,
) -> Result<DataSet, Error> {
    if !patch.category.is_mentioned() && !patch.filters.is_mentioned() {
        return Err(CoreError::invalid("there are no fields to update").into());
    }

    let category = match &patch.category {
        Field::Unset => None,
        Field::Null => return Err(CoreError::invalid("'category' cannot be None").into()),
        Field::Set(v) => {
            validate_field("category", Some(v), false)?;
            Some(v.clone())
        }
    };
    let filters_text = match &patch.filters {
        Field::Unset => None,
        Field::Null => return Err(CoreError::invalid("'filters' cannot be None").into()),
        Field::Set(v) => Some(canonical_filters(v)?),
    };

    let mut tx = pool.begin().await.map_err(Error::from)?;

    let current = DataSetRepo::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Dataset ID {id}")))?;

    let log = TransactionsLog::open(&mut tx, "update_dataset", ctx).await?;

    let mut args = serde_json::Map::new();
    args.insert("id".to_string(), json!(id));
    if patch.category.is_mentioned() {
        args.insert("category".to_string(), json!(category));
    }
    if let Field::Set(v) = &patch.filters {
        args.insert("filters".to_string(), v.clone());
    }

    let updated = DataSetRepo::update(
        &mut tx,
        id,
        category.as_deref().unwrap_or(&current.category),
        filters_text.as_deref().unwrap_or(&current.filters),
    )
    .await?;

    log.log_operation(
        &mut tx,
        OpType::Update,
        "dataset",
        &id.to_string(),
        serde_json::Value::Object(args),
    )
    .await?;
    log.close(&mut tx).await?;

    tx.commit().await.map_err(Error::from)?;
    tracing::info!(id, "dataset updated");
    Ok(updated)
}

/// Remove a data set. When it was the last one referencing its data
/// source, the data source is removed too. Returns the data set row
/// as it was before deletion.
pub async fn delete_dataset(
    pool: &DbPool,
    ctx: &RegistryContext,
    id: DbId,
) -> Result<DataSet, Error> {
    let mut tx = pool.begin().await.map_err(Error::from)?;

    let dataset = DataSetRepo::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Dataset ID {id}")))?;
    let datasource = DataSourceRepo::find_by_id(&mut tx, dataset.datasource_id)
        .await?
        .ok_or_else(|| {
            CoreError::Internal(format!(
                "dataset ID {id} references missing datasource ID {}",
                dataset.datasource_id
            ))
        })?;

    let log = TransactionsLog::open(&mut tx, "delete_dataset", ctx).await?;

    DataSetRepo::delete(&mut tx, id).await?;
    log.log_operation(
        &mut tx,
        OpType::Delete,
        "dataset",
        &id.to_string(),
        json!({ "id": id }),
    )
    .await?;

    // Garbage-collect the data source when nothing references it
    // anymore.
    let remaining = DataSetRepo::count_by_datasource(&mut tx, datasource.id).await?;
    if remaining == 0 {
        DataSourceRepo::delete(&mut tx, datasource.id).await?;
        log.log_operation(
            &mut tx,
            OpType::Delete,
            "datasource",
            &datasource.uri,
            json!({ "uri": datasource.uri }),
        )
        .await?;
        tracing::info!(datasource_id = datasource.id, uri = %datasource.uri, "orphaned datasource removed");
    }

    log.close(&mut tx).await?;

    tx.commit().await.map_err(Error::from)?;
    tracing::info!(id, "dataset deleted");
    Ok(dataset)
}

/// Mark a data set as archived. Archiving twice is an error.
pub async fn archive_dataset(
    pool: &DbPool,
    ctx: &RegistryContext,
    id: DbId,
) -> Result<DataSet, Error> {
    set_archive_flag(pool, ctx, id, true).await
}

/// Bring an archived data set back. Unarchiving an active data set is
/// an error.
pub async fn unarchive_dataset(
    pool: &DbPool,
    ctx: &RegistryContext,
    id: DbId,
) -> Result<DataSet, Error> {
    set_archive_flag(pool, ctx, id, false).await
}

async fn set_archive_flag(
    pool: &DbPool,
    ctx: &RegistryContext,
    id: DbId,
    archived: bool,
) -> Result<DataSet, Error> {
    let mut tx = pool.begin().await.map_err(Error::from)?;

    let dataset = DataSetRepo::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Dataset ID {id}")))?;

    if dataset.is_archived == archived {
        let state = if archived { "already" } else { "not" };
        return Err(CoreError::invalid(format!("Dataset ID {id} is {state} archived")).into());
    }

    let name = if archived {
        "archive_dataset"
    } else {
        "unarchive_dataset"
    };
    let log = TransactionsLog::open(&mut tx, name, ctx).await?;

    let updated = DataSetRepo::set_archived(&mut tx, id, archived).await?;
    log.log_operation(
        &mut tx,
        OpType::Update,
        "dataset",
        &id.to_string(),
        json!({ "id": id, "archived": archived }),
    )
    .await?;
    log.close(&mut tx).await?;

    tx.commit().await.map_err(Error::from)?;
    tracing::info!(id, archived, "dataset archive flag changed");
    Ok(updated)
}

/// Move a data set to another project.
pub async fn link_dataset_project(
    pool: &DbPool,
    ctx: &RegistryContext,
    dataset_id: DbId,
    project_id: DbId,
) -> Result<DataSet, Error> {
    let mut tx = pool.begin().await.map_err(Error::from)?;

    let dataset = DataSetRepo::find_by_id(&mut tx, dataset_id)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Dataset ID {dataset_id}")))?;
    ProjectRepo::find_by_id(&mut tx, project_id)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Project ID {project_id}")))?;

    if dataset.project_id == project_id {
        return Err(CoreError::invalid(format!(
            "Dataset ID {dataset_id} is already assigned to project ID {project_id}"
        ))
        .into());
    }

    let log = TransactionsLog::open(&mut tx, "link_dataset_project", ctx).await?;
    let args = json!({
        "dataset_id": dataset_id,
        "project_id": project_id,
    });

    let moved = DataSetRepo::set_project(&mut tx, dataset_id, project_id).await?;
    log.log_operation(
        &mut tx,
        OpType::Link,
        "dataset",
        &dataset_id.to_string(),
        args,
    )
    .await?;
    log.close(&mut tx).await?;

    tx.commit().await.map_err(Error::from)?;
    tracing::info!(dataset_id, project_id, "dataset linked to project");
    Ok(moved)
}
