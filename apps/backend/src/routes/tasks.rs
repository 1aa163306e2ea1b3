//! Task CRUD endpoints.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::tasks::{self, TaskPriority};
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::repos::tasks as tasks_repo;
use crate::repos::tasks::{CreateTask, TaskFilter, UpdateTask};
use crate::routes::{format_timestamp, parse_timestamp};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub user_id: String,
    pub project_id: Uuid,
    pub title: String,
    pub priority: TaskPriority,
    pub due_date: Option<String>,
    pub completed: bool,
    pub completed_at: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<tasks::Model> for TaskResponse {
    fn from(value: tasks::Model) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            project_id: value.project_id,
            title: value.title,
            priority: value.priority,
            due_date: value.due_date.map(format_timestamp),
            completed: value.completed,
            completed_at: value.completed_at.map(format_timestamp),
            notes: value.notes,
            created_at: format_timestamp(value.created_at),
            updated_at: format_timestamp(value.updated_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub project_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub completed: Option<bool>,
}

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.is_empty() || title.chars().count() > 500 {
        return Err(AppError::validation(
            "title must be between 1 and 500 characters",
        ));
    }
    Ok(())
}

async fn list_tasks(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    query: web::Query<ListTasksQuery>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.db()?;
    let filter = TaskFilter {
        project_id: query.project_id,
        completed: query.completed,
    };
    let rows = tasks_repo::list(db, &current_user.user_id, filter).await?;
    let body: Vec<TaskResponse> = rows.into_iter().map(TaskResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn create_task(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    validate_title(&payload.title)?;

    let due_date = payload
        .due_date
        .as_deref()
        .map(|raw| parse_timestamp("due_date", raw))
        .transpose()?;

    let db = app_state.db()?;
    let created = tasks_repo::create(
        db,
        &current_user.user_id,
        CreateTask {
            project_id: payload.project_id,
            title: payload.title,
            priority: payload.priority,
            due_date,
            notes: payload.notes,
        },
    )
    .await?;
    Ok(HttpResponse::Created().json(TaskResponse::from(created)))
}

async fn get_task(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.db()?;
    let task = tasks_repo::find_owned(db, &current_user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

async fn update_task(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: ValidatedJson<UpdateTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    if let Some(title) = &payload.title {
        validate_title(title)?;
    }

    let due_date = payload
        .due_date
        .as_deref()
        .map(|raw| parse_timestamp("due_date", raw))
        .transpose()?;

    let update = UpdateTask {
        title: payload.title,
        priority: payload.priority,
        due_date,
        completed: payload.completed,
        notes: payload.notes,
    };
    if update.is_empty() {
        return Err(AppError::validation("No fields to update"));
    }

    let db = app_state.db()?;
    let updated = tasks_repo::update(db, &current_user.user_id, path.into_inner(), update).await?;
    Ok(HttpResponse::Ok().json(TaskResponse::from(updated)))
}

async fn delete_task(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.db()?;
    tasks_repo::delete(db, &current_user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_tasks));
    cfg.route("", web::post().to(create_task));
    cfg.route("/{task_id}", web::get().to(get_task));
    cfg.route("/{task_id}", web::patch().to(update_task));
    cfg.route("/{task_id}", web::delete().to(delete_task));
}
