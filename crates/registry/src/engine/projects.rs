//! Project operations, including the parent/child linking rules.

use std::collections::VecDeque;

use grove_core::error::CoreError;
use grove_core::types::DbId;
use grove_core::validation::{validate_field, validate_name};
use grove_db::models::audit::OpType;
use grove_db::models::field::Field;
use grove_db::models::project::{Project, ProjectPatch};
use grove_db::repositories::{EcosystemRepo, ProjectRepo};
use grove_db::DbPool;
use serde_json::json;
use sqlx::PgConnection;

use crate::context::RegistryContext;
use crate::engine::{raw_patch_value, to_none_if_empty};
use crate::error::Error;
use crate::log::TransactionsLog;

/// Add a new project to an ecosystem, optionally under a parent
/// project of the same ecosystem.
pub async fn add_project(
    pool: &DbPool,
    ctx: &RegistryContext,
    ecosystem_id: DbId,
    name: &str,
    title: Option<&str>,
    parent_id: Option<DbId>,
) -> Result<Project, Error> {
    validate_name(Some(name))?;
    validate_field("title", title, true)?;

    let mut tx = pool.begin().await.map_err(Error::from)?;

    EcosystemRepo::find_by_id(&mut tx, ecosystem_id)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Ecosystem ID {ecosystem_id}")))?;

    if let Some(pid) = parent_id {
        let parent = ProjectRepo::find_by_id(&mut tx, pid)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("Project ID {pid}")))?;
        if parent.ecosystem_id != ecosystem_id {
            return Err(CoreError::invalid(format!(
                "Project ID {pid} belongs to a different ecosystem"
            ))
            .into());
        }
    }

    let log = TransactionsLog::open(&mut tx, "add_project", ctx).await?;
    let args = json!({
        "ecosystem_id": ecosystem_id,
        "name": name,
        "title": title,
        "parent_id": parent_id,
    });

    let project = ProjectRepo::insert(&mut tx, name, title, ecosystem_id, parent_id).await?;
    log.log_operation(&mut tx, OpType::Add, "project", name, args)
        .await?;
    log.close(&mut tx).await?;

    tx.commit().await.map_err(Error::from)?;
    tracing::info!(id = project.id, name, ecosystem_id, "project added");
    Ok(project)
}

/// Update a project. Fields absent from the patch keep their value.
pub async fn update_project(
    pool: &DbPool,
    ctx: &RegistryContext,
    id: DbId,
    patch: &ProjectPatch,
) -> Result<Project, Error> {
    if !patch.name.is_mentioned() && !patch.title.is_mentioned() {
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
    let title = match &patch.title {
        Field::Unset | Field::Null => None,
        Field::Set(v) => {
            let value = to_none_if_empty(Some(v.clone()));
            validate_field("title", value.as_deref(), true)?;
            value
        }
    };

    let mut tx = pool.begin().await.map_err(Error::from)?;

    let current = ProjectRepo::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Project ID {id}")))?;

    let log = TransactionsLog::open(&mut tx, "update_project", ctx).await?;

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

    let updated = ProjectRepo::update(
        &mut tx,
        id,
        name.as_deref().unwrap_or(&current.name),
        if patch.title.is_mentioned() {
            title.as_deref()
        } else {
            current.title.as_deref()
        },
    )
    .await?;

    log.log_operation(
        &mut tx,
        OpType::Update,
        "project",
        &id.to_string(),
        serde_json::Value::Object(args),
    )
    .await?;
    log.close(&mut tx).await?;

    tx.commit().await.map_err(Error::from)?;
    tracing::info!(id, "project updated");
    Ok(updated)
}

/// Remove a project with all its subprojects and data sets. Returns
/// the row as it was before deletion.
pub async fn delete_project(
    pool: &DbPool,
    ctx: &RegistryContext,
    id: DbId,
) -> Result<Project, Error> {
    let mut tx = pool.begin().await.map_err(Error::from)?;

    let project = ProjectRepo::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Project ID {id}")))?;

    let log = TransactionsLog::open(&mut tx, "delete_project", ctx).await?;

    ProjectRepo::delete(&mut tx, id).await?;
    log.log_operation(
        &mut tx,
        OpType::Delete,
        "project",
        &id.to_string(),
        json!({ "id": id }),
    )
    .await?;
    log.close(&mut tx).await?;

    tx.commit().await.map_err(Error::from)?;
    tracing::info!(id, name = %project.name, "project deleted");
    Ok(project)
}

/// Move a project under a new parent, or detach it with `None`.
///
/// The link is rejected when it would be a no-op, cross ecosystems,
/// make the project its own parent, or create a cycle.
pub async fn move_project(
    pool: &DbPool,
    ctx: &RegistryContext,
    project_id: DbId,
    parent_id: Option<DbId>,
) -> Result<Project, Error> {
    let mut tx = pool.begin().await.map_err(Error::from)?;

    let project = ProjectRepo::find_by_id(&mut tx, project_id)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Project ID {project_id}")))?;

    match parent_id {
        Some(pid) => {
            if pid == project_id {
                return Err(
                    CoreError::invalid("a project cannot be its own parent").into()
                );
            }
            let parent = ProjectRepo::find_by_id(&mut tx, pid)
                .await?
                .ok_or_else(|| CoreError::not_found(format!("Project ID {pid}")))?;
            if parent.ecosystem_id != project.ecosystem_id {
                return Err(CoreError::invalid(format!(
                    "Project ID {pid} belongs to a different ecosystem"
                ))
                .into());
            }
            if project.parent_id == Some(pid) {
                return Err(CoreError::invalid(format!(
                    "Project ID {pid} is already the parent of project ID {project_id}"
                ))
                .into());
            }
            if is_descendant(&mut tx, project_id, pid).await? {
                return Err(CoreError::invalid(format!(
                    "Project ID {pid} is a descendant of project ID {project_id}"
                ))
                .into());
            }
        }
        None => {
            if project.parent_id.is_none() {
                return Err(CoreError::invalid(format!(
                    "Project ID {project_id} has no parent project"
                ))
                .into());
            }
        }
    }

    let log = TransactionsLog::open(&mut tx, "move_project", ctx).await?;
    let args = json!({
        "project_id": project_id,
        "parent_id": parent_id,
    });

    let moved = ProjectRepo::set_parent(&mut tx, project_id, parent_id).await?;
    log.log_operation(
        &mut tx,
        OpType::Link,
        "project",
        &project_id.to_string(),
        args,
    )
    .await?;
    log.close(&mut tx).await?;

    tx.commit().await.map_err(Error::from)?;
    tracing::info!(project_id, ?parent_id, "project moved");
    Ok(moved)
}

/// Breadth-first walk over the subproject tree rooted at `root`,
/// checking whether `candidate` appears in it.
async fn is_descendant(
    conn: &mut PgConnection,
    root: DbId,
    candidate: DbId,
) -> Result<bool, Error> {
    let mut queue = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        for child in ProjectRepo::list_subprojects(conn, current).await? {
            if child.id == candidate {
                return Ok(true);
            }
            queue.push_back(child.id);
        }
    }
    Ok(false)
}
