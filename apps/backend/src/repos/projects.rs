//! Project repository functions.
//!
//! Every query here is scoped to the owning user. A row that exists but
//! belongs to a different user is indistinguishable from a row that does
//! not exist at all; both surface as `AppError::Authorization`.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::projects::{self, ProjectStatus};
use crate::error::AppError;

/// Fields accepted when creating a project.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

impl UpdateProject {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    status: Option<ProjectStatus>,
) -> Result<Vec<projects::Model>, AppError> {
    let mut query = projects::Entity::find().filter(projects::Column::UserId.eq(user_id));
    if let Some(status) = status {
        query = query.filter(projects::Column::Status.eq(status));
    }
    let rows = query
        .order_by_desc(projects::Column::CreatedAt)
        .all(conn)
        .await?;
    Ok(rows)
}

/// Loads a project owned by `user_id`, or fails with an authorization error.
pub async fn find_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    project_id: Uuid,
) -> Result<projects::Model, AppError> {
    projects::Entity::find_by_id(project_id)
        .filter(projects::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::authorization(format!("project {project_id} not visible to caller")))
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    data: CreateProject,
) -> Result<projects::Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let model = projects::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id.to_string()),
        name: Set(data.name),
        description: Set(data.description),
        status: Set(data.status.unwrap_or_default()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(conn).await?)
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    project_id: Uuid,
    data: UpdateProject,
) -> Result<projects::Model, AppError> {
    let existing = find_owned(conn, user_id, project_id).await?;

    let mut model: projects::ActiveModel = existing.into();
    if let Some(name) = data.name {
        model.name = Set(name);
    }
    if let Some(description) = data.description {
        model.description = Set(Some(description));
    }
    if let Some(status) = data.status {
        model.status = Set(status);
    }
    model.updated_at = Set(OffsetDateTime::now_utc());

    Ok(model.update(conn).await?)
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    project_id: Uuid,
) -> Result<(), AppError> {
    let result = projects::Entity::delete_many()
        .filter(projects::Column::Id.eq(project_id))
        .filter(projects::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::authorization(format!(
            "project {project_id} not visible to caller"
        )));
    }
    Ok(())
}
