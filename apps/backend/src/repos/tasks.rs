//! Task repository functions.
//!
//! Creation checks that the target project belongs to the caller before
//! inserting. `completed_at` is managed here so every write path agrees
//! on the stamping rule.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::tasks::{self, TaskPriority};
use crate::error::AppError;
use crate::repos::projects;

/// Optional listing filters, combined with AND.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub project_id: Option<Uuid>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct CreateTask {
    pub project_id: Uuid,
    pub title: String,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<OffsetDateTime>,
    pub notes: Option<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<OffsetDateTime>,
    pub completed: Option<bool>,
    pub notes: Option<String>,
}

impl UpdateTask {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
            && self.notes.is_none()
    }
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    filter: TaskFilter,
) -> Result<Vec<tasks::Model>, AppError> {
    let mut query = tasks::Entity::find().filter(tasks::Column::UserId.eq(user_id));
    if let Some(project_id) = filter.project_id {
        query = query.filter(tasks::Column::ProjectId.eq(project_id));
    }
    if let Some(completed) = filter.completed {
        query = query.filter(tasks::Column::Completed.eq(completed));
    }
    let rows = query
        .order_by_desc(tasks::Column::CreatedAt)
        .all(conn)
        .await?;
    Ok(rows)
}

/// Loads a task owned by `user_id`, or fails with an authorization error.
pub async fn find_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    task_id: Uuid,
) -> Result<tasks::Model, AppError> {
    tasks::Entity::find_by_id(task_id)
        .filter(tasks::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::authorization(format!("task {task_id} not visible to caller")))
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    data: CreateTask,
) -> Result<tasks::Model, AppError> {
    // The parent project must be visible to the caller before we attach
    // anything to it.
    projects::find_owned(conn, user_id, data.project_id).await?;

    let now = OffsetDateTime::now_utc();
    let model = tasks::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id.to_string()),
        project_id: Set(data.project_id),
        title: Set(data.title),
        priority: Set(data.priority.unwrap_or_default()),
        due_date: Set(data.due_date),
        completed: Set(false),
        completed_at: Set(None),
        notes: Set(data.notes),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(conn).await?)
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    task_id: Uuid,
    data: UpdateTask,
) -> Result<tasks::Model, AppError> {
    let existing = find_owned(conn, user_id, task_id).await?;
    let was_completed = existing.completed;

    let mut model: tasks::ActiveModel = existing.into();
    if let Some(title) = data.title {
        model.title = Set(title);
    }
    if let Some(priority) = data.priority {
        model.priority = Set(priority);
    }
    if let Some(due_date) = data.due_date {
        model.due_date = Set(Some(due_date));
    }
    if let Some(notes) = data.notes {
        model.notes = Set(Some(notes));
    }
    if let Some(completed) = data.completed {
        model.completed = Set(completed);
        if completed && !was_completed {
            model.completed_at = Set(Some(OffsetDateTime::now_utc()));
        } else if !completed {
            model.completed_at = Set(None);
        }
    }
    model.updated_at = Set(OffsetDateTime::now_utc());

    Ok(model.update(conn).await?)
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    task_id: Uuid,
) -> Result<(), AppError> {
    let result = tasks::Entity::delete_many()
        .filter(tasks::Column::Id.eq(task_id))
        .filter(tasks::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::authorization(format!(
            "task {task_id} not visible to caller"
        )));
    }
    Ok(())
}
