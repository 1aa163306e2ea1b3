//! Reminder endpoints.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::reminders;
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::repos::reminders as reminders_repo;
use crate::repos::reminders::CreateReminder;
use crate::routes::{format_timestamp, parse_timestamp};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReminderResponse {
    pub id: Uuid,
    pub user_id: String,
    pub task_id: Option<Uuid>,
    pub message: String,
    pub due_time: String,
    pub created_at: String,
}

impl From<reminders::Model> for ReminderResponse {
    fn from(value: reminders::Model) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            task_id: value.task_id,
            message: value.message,
            due_time: format_timestamp(value.due_time),
            created_at: format_timestamp(value.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateReminderRequest {
    #[serde(default)]
    pub task_id: Option<Uuid>,
    pub message: String,
    pub due_time: String,
}

async fn list_reminders(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.db()?;
    let rows = reminders_repo::list(db, &current_user.user_id).await?;
    let body: Vec<ReminderResponse> = rows.into_iter().map(ReminderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn create_reminder(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateReminderRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    if payload.message.is_empty() {
        return Err(AppError::validation("message must not be empty"));
    }
    let due_time = parse_timestamp("due_time", &payload.due_time)?;

    let db = app_state.db()?;
    let created = reminders_repo::create(
        db,
        &current_user.user_id,
        CreateReminder {
            task_id: payload.task_id,
            message: payload.message,
            due_time,
        },
    )
    .await?;
    Ok(HttpResponse::Created().json(ReminderResponse::from(created)))
}

async fn delete_reminder(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.db()?;
    reminders_repo::delete(db, &current_user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_reminders));
    cfg.route("", web::post().to(create_reminder));
    cfg.route("/{reminder_id}", web::delete().to(delete_reminder));
}
