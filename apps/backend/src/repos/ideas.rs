//! Idea repository functions.
//!
//! Ideas are append-only; the one mutation allowed after capture is the
//! promotion link written by [`set_promoted`], which callers run inside
//! the same transaction that creates the project.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::ideas;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct CreateIdea {
    pub title: String,
    pub description: Option<String>,
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
) -> Result<Vec<ideas::Model>, AppError> {
    let rows = ideas::Entity::find()
        .filter(ideas::Column::UserId.eq(user_id))
        .order_by_desc(ideas::Column::CreatedAt)
        .all(conn)
        .await?;
    Ok(rows)
}

/// Loads an idea owned by `user_id`, or fails with an authorization error.
pub async fn find_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    idea_id: Uuid,
) -> Result<ideas::Model, AppError> {
    ideas::Entity::find_by_id(idea_id)
        .filter(ideas::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::authorization(format!("idea {idea_id} not visible to caller")))
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    data: CreateIdea,
) -> Result<ideas::Model, AppError> {
    let model = ideas::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id.to_string()),
        title: Set(data.title),
        description: Set(data.description),
        promoted_to_project_id: Set(None),
        created_at: Set(OffsetDateTime::now_utc()),
    };
    Ok(model.insert(conn).await?)
}

/// Records which project an idea was promoted into.
pub async fn set_promoted<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    idea: ideas::Model,
    project_id: Uuid,
) -> Result<ideas::Model, AppError> {
    let mut model: ideas::ActiveModel = idea.into();
    model.promoted_to_project_id = Set(Some(project_id));
    Ok(model.update(conn).await?)
}
