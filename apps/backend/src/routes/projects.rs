//! Project CRUD endpoints.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::projects::{self, ProjectStatus};
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::repos::projects::{CreateProject, UpdateProject};
use crate::repos::projects as projects_repo;
use crate::routes::format_timestamp;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<projects::Model> for ProjectResponse {
    fn from(value: projects::Model) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            name: value.name,
            description: value.description,
            status: value.status,
            created_at: format_timestamp(value.created_at),
            updated_at: format_timestamp(value.updated_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    #[serde(default)]
    pub status: Option<ProjectStatus>,
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() || name.chars().count() > 255 {
        return Err(AppError::validation(
            "name must be between 1 and 255 characters",
        ));
    }
    Ok(())
}

async fn list_projects(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    query: web::Query<ListProjectsQuery>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.db()?;
    let rows = projects_repo::list(db, &current_user.user_id, query.status).await?;
    let body: Vec<ProjectResponse> = rows.into_iter().map(ProjectResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn create_project(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateProjectRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    validate_name(&payload.name)?;

    let db = app_state.db()?;
    let created = projects_repo::create(
        db,
        &current_user.user_id,
        CreateProject {
            name: payload.name,
            description: payload.description,
            status: payload.status,
        },
    )
    .await?;
    Ok(HttpResponse::Created().json(ProjectResponse::from(created)))
}

async fn get_project(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.db()?;
    let project = projects_repo::find_owned(db, &current_user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ProjectResponse::from(project)))
}

async fn update_project(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: ValidatedJson<UpdateProjectRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    if let Some(name) = &payload.name {
        validate_name(name)?;
    }

    let update = UpdateProject {
        name: payload.name,
        description: payload.description,
        status: payload.status,
    };
    if update.is_empty() {
        return Err(AppError::validation("No fields to update"));
    }

    let db = app_state.db()?;
    let updated =
        projects_repo::update(db, &current_user.user_id, path.into_inner(), update).await?;
    Ok(HttpResponse::Ok().json(ProjectResponse::from(updated)))
}

async fn delete_project(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.db()?;
    projects_repo::delete(db, &current_user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_projects));
    cfg.route("", web::post().to(create_project));
    cfg.route("/{project_id}", web::get().to(get_project));
    cfg.route("/{project_id}", web::patch().to(update_project));
    cfg.route("/{project_id}", web::delete().to(delete_project));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_length_bounds() {
        assert!(validate_name("p").is_ok());
        assert!(validate_name(&"x".repeat(255)).is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(256)).is_err());
    }
}
