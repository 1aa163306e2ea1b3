//! Reminder repository functions.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::reminders;
use crate::error::AppError;
use crate::repos::tasks;

#[derive(Debug, Clone)]
pub struct CreateReminder {
    pub task_id: Option<Uuid>,
    pub message: String,
    pub due_time: OffsetDateTime,
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
) -> Result<Vec<reminders::Model>, AppError> {
    let rows = reminders::Entity::find()
        .filter(reminders::Column::UserId.eq(user_id))
        .order_by_asc(reminders::Column::DueTime)
        .all(conn)
        .await?;
    Ok(rows)
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    data: CreateReminder,
) -> Result<reminders::Model, AppError> {
    // A linked task must be visible to the caller.
    if let Some(task_id) = data.task_id {
        tasks::find_owned(conn, user_id, task_id).await?;
    }

    let model = reminders::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id.to_string()),
        task_id: Set(data.task_id),
        message: Set(data.message),
        due_time: Set(data.due_time),
        created_at: Set(OffsetDateTime::now_utc()),
    };
    Ok(model.insert(conn).await?)
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    reminder_id: Uuid,
) -> Result<(), AppError> {
    let result = reminders::Entity::delete_many()
        .filter(reminders::Column::Id.eq(reminder_id))
        .filter(reminders::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::authorization(format!(
            "reminder {reminder_id} not visible to caller"
        )));
    }
    Ok(())
}
