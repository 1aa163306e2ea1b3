use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::extension::postgres::Type as PgType;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Projects {
    Table,
    Id,
    UserId,
    Name,
    Description,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Tasks {
    Table,
    Id,
    UserId,
    ProjectId,
    Title,
    Priority,
    DueDate,
    Completed,
    CompletedAt,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Ideas {
    Table,
    Id,
    UserId,
    Title,
    Description,
    PromotedToProjectId,
    CreatedAt,
}

#[derive(Iden)]
enum Reminders {
    Table,
    Id,
    UserId,
    TaskId,
    Message,
    DueTime,
    CreatedAt,
}

#[derive(Iden)]
enum Notes {
    Table,
    Id,
    UserId,
    ProjectId,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ProjectStatusEnum {
    #[iden = "project_status"]
    Type,
}

#[derive(Iden)]
enum TaskPriorityEnum {
    #[iden = "task_priority"]
    Type,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                PgType::create()
                    .as_enum(ProjectStatusEnum::Type)
                    .values(["active", "archived", "completed"])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                PgType::create()
                    .as_enum(TaskPriorityEnum::Type)
                    .values(["high", "medium", "low"])
                    .to_owned(),
            )
            .await?;

        // projects
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Projects::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Projects::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Projects::Description).text().null())
                    .col(
                        ColumnDef::new(Projects::Status)
                            .custom(ProjectStatusEnum::Type)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Projects::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_projects_user_id")
                    .table(Projects::Table)
                    .col(Projects::UserId)
                    .to_owned(),
            )
            .await?;

        // tasks
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tasks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tasks::UserId).string().not_null())
                    .col(ColumnDef::new(Tasks::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Tasks::Title).string_len(500).not_null())
                    .col(
                        ColumnDef::new(Tasks::Priority)
                            .custom(TaskPriorityEnum::Type)
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(Tasks::DueDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Tasks::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Tasks::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Tasks::Notes).text().null())
                    .col(
                        ColumnDef::new(Tasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_project_id")
                            .from(Tasks::Table, Tasks::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_tasks_user_id")
                    .table(Tasks::Table)
                    .col(Tasks::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_tasks_project_id")
                    .table(Tasks::Table)
                    .col(Tasks::ProjectId)
                    .to_owned(),
            )
            .await?;

        // ideas
        manager
            .create_table(
                Table::create()
                    .table(Ideas::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Ideas::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Ideas::UserId).string().not_null())
                    .col(ColumnDef::new(Ideas::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Ideas::Description).text().null())
                    .col(ColumnDef::new(Ideas::PromotedToProjectId).uuid().null())
                    .col(
                        ColumnDef::new(Ideas::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ideas_promoted_to_project_id")
                            .from(Ideas::Table, Ideas::PromotedToProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_ideas_user_id")
                    .table(Ideas::Table)
                    .col(Ideas::UserId)
                    .to_owned(),
            )
            .await?;

        // reminders
        manager
            .create_table(
                Table::create()
                    .table(Reminders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reminders::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reminders::UserId).string().not_null())
                    .col(ColumnDef::new(Reminders::TaskId).uuid().null())
                    .col(ColumnDef::new(Reminders::Message).text().not_null())
                    .col(
                        ColumnDef::new(Reminders::DueTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reminders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reminders_task_id")
                            .from(Reminders::Table, Reminders::TaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_reminders_user_id")
                    .table(Reminders::Table)
                    .col(Reminders::UserId)
                    .to_owned(),
            )
            .await?;

        // notes
        manager
            .create_table(
                Table::create()
                    .table(Notes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Notes::UserId).string().not_null())
                    .col(ColumnDef::new(Notes::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Notes::Content).text().not_null())
                    .col(
                        ColumnDef::new(Notes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notes_project_id")
                            .from(Notes::Table, Notes::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_notes_user_id")
                    .table(Notes::Table)
                    .col(Notes::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_notes_project_id")
                    .table(Notes::Table)
                    .col(Notes::ProjectId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse dependency order
        manager
            .drop_table(Table::drop().table(Notes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reminders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ideas::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;

        manager
            .drop_type(PgType::drop().name(TaskPriorityEnum::Type).to_owned())
            .await?;
        manager
            .drop_type(PgType::drop().name(ProjectStatusEnum::Type).to_owned())
            .await?;

        Ok(())
    }
}
