//! Note CRUD endpoints.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::notes;
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::repos::notes as notes_repo;
use crate::repos::notes::CreateNote;
use crate::routes::format_timestamp;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: Uuid,
    pub user_id: String,
    pub project_id: Uuid,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<notes::Model> for NoteResponse {
    fn from(value: notes::Model) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            project_id: value.project_id,
            content: value.content,
            created_at: format_timestamp(value.created_at),
            updated_at: format_timestamp(value.updated_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub project_id: Uuid,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub content: String,
}

fn validate_content(content: &str) -> Result<(), AppError> {
    if content.is_empty() {
        return Err(AppError::validation("content must not be empty"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct ListNotesQuery {
    #[serde(default)]
    pub project_id: Option<Uuid>,
}

async fn list_notes(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    query: web::Query<ListNotesQuery>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.db()?;
    let rows = notes_repo::list(db, &current_user.user_id, query.project_id).await?;
    let body: Vec<NoteResponse> = rows.into_iter().map(NoteResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn create_note(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateNoteRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    validate_content(&payload.content)?;

    let db = app_state.db()?;
    let created = notes_repo::create(
        db,
        &current_user.user_id,
        CreateNote {
            project_id: payload.project_id,
            content: payload.content,
        },
    )
    .await?;
    Ok(HttpResponse::Created().json(NoteResponse::from(created)))
}

async fn get_note(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.db()?;
    let note = notes_repo::find_owned(db, &current_user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(NoteResponse::from(note)))
}

async fn update_note(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: ValidatedJson<UpdateNoteRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    validate_content(&payload.content)?;

    let db = app_state.db()?;
    let updated =
        notes_repo::update(db, &current_user.user_id, path.into_inner(), payload.content).await?;
    Ok(HttpResponse::Ok().json(NoteResponse::from(updated)))
}

async fn delete_note(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.db()?;
    notes_repo::delete(db, &current_user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_notes));
    cfg.route("", web::post().to(create_note));
    cfg.route("/{note_id}", web::get().to(get_note));
    cfg.route("/{note_id}", web::patch().to(update_note));
    cfg.route("/{note_id}", web::delete().to(delete_note));
}
