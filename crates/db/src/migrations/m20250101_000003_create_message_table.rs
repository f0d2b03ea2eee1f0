//! Create message table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Message::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Message::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Message::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Message::Text).string_len(140).not_null())
                    .col(
                        ColumnDef::new(Message::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_message_user")
                            .from(Message::Table, Message::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for per-user feeds)
        manager
            .create_index(
                Index::create()
                    .name("idx_message_user_id")
                    .table(Message::Table)
                    .col(Message::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (for timeline ordering)
        manager
            .create_index(
                Index::create()
                    .name("idx_message_created_at")
                    .table(Message::Table)
                    .col(Message::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Message::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Message {
    Table,
    Id,
    UserId,
    Text,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
