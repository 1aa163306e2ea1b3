//! Note repository functions.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::notes;
use crate::error::AppError;
use crate::repos::projects;

#[derive(Debug, Clone)]
pub struct CreateNote {
    pub project_id: Uuid,
    pub content: String,
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    project_id: Option<Uuid>,
) -> Result<Vec<notes::Model>, AppError> {
    let mut query = notes::Entity::find().filter(notes::Column::UserId.eq(user_id));
    if let Some(project_id) = project_id {
        query = query.filter(notes::Column::ProjectId.eq(project_id));
    }
    let rows = query
        .order_by_desc(notes::Column::CreatedAt)
        .all(conn)
        .await?;
    Ok(rows)
}

/// Loads a note owned by `user_id`, or fails with an authorization error.
pub async fn find_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    note_id: Uuid,
) -> Result<notes::Model, AppError> {
    notes::Entity::find_by_id(note_id)
        .filter(notes::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::authorization(format!("note {note_id} not visible to caller")))
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    data: CreateNote,
) -> Result<notes::Model, AppError> {
    // The parent project must be visible to the caller.
    projects::find_owned(conn, user_id, data.project_id).await?;

    let now = OffsetDateTime::now_utc();
    let model = notes::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id.to_string()),
        project_id: Set(data.project_id),
        content: Set(data.content),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(conn).await?)
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    note_id: Uuid,
    content: String,
) -> Result<notes::Model, AppError> {
    let existing = find_owned(conn, user_id, note_id).await?;

    let mut model: notes::ActiveModel = existing.into();
    model.content = Set(content);
    model.updated_at = Set(OffsetDateTime::now_utc());
    Ok(model.update(conn).await?)
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    note_id: Uuid,
) -> Result<(), AppError> {
    let result = notes::Entity::delete_many()
        .filter(notes::Column::Id.eq(note_id))
        .filter(notes::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::authorization(format!(
            "note {note_id} not visible to caller"
        )));
    }
    Ok(())
}
