//! Idea capture and promotion endpoints.

use actix_web::{web, HttpResponse};
use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::ideas;
use crate::entities::projects::ProjectStatus;
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::repos::ideas as ideas_repo;
use crate::repos::ideas::CreateIdea;
use crate::repos::projects as projects_repo;
use crate::repos::projects::CreateProject;
use crate::routes::format_timestamp;
use crate::routes::projects::ProjectResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct IdeaResponse {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub promoted_to_project_id: Option<Uuid>,
    pub created_at: String,
}

impl From<ideas::Model> for IdeaResponse {
    fn from(value: ideas::Model) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            title: value.title,
            description: value.description,
            promoted_to_project_id: value.promoted_to_project_id,
            created_at: format_timestamp(value.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateIdeaRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PromoteIdeaRequest {
    pub project_name: String,
}

/// Promotion creates the project and stamps the idea in one response body.
#[derive(Debug, Serialize)]
pub struct PromoteIdeaResponse {
    pub idea: IdeaResponse,
    pub project: ProjectResponse,
}

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.is_empty() || title.chars().count() > 255 {
        return Err(AppError::validation(
            "title must be between 1 and 255 characters",
        ));
    }
    Ok(())
}

async fn list_ideas(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.db()?;
    let rows = ideas_repo::list(db, &current_user.user_id).await?;
    let body: Vec<IdeaResponse> = rows.into_iter().map(IdeaResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn create_idea(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateIdeaRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    validate_title(&payload.title)?;

    let db = app_state.db()?;
    let created = ideas_repo::create(
        db,
        &current_user.user_id,
        CreateIdea {
            title: payload.title,
            description: payload.description,
        },
    )
    .await?;
    Ok(HttpResponse::Created().json(IdeaResponse::from(created)))
}

/// Turns an idea into a project. The project insert and the promotion link
/// commit together or not at all.
async fn promote_idea(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: ValidatedJson<PromoteIdeaRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    validate_title(&payload.project_name)?;

    let db = app_state.db()?;
    let txn = db.begin().await?;

    let idea = ideas_repo::find_owned(&txn, &current_user.user_id, path.into_inner()).await?;
    let project = projects_repo::create(
        &txn,
        &current_user.user_id,
        CreateProject {
            name: payload.project_name,
            description: idea.description.clone(),
            status: Some(ProjectStatus::Active),
        },
    )
    .await?;
    let idea = ideas_repo::set_promoted(&txn, idea, project.id).await?;

    txn.commit().await?;

    Ok(HttpResponse::Ok().json(PromoteIdeaResponse {
        idea: IdeaResponse::from(idea),
        project: ProjectResponse::from(project),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_ideas));
    cfg.route("", web::post().to(create_idea));
    cfg.route("/{idea_id}/promote", web::post().to(promote_idea));
}
