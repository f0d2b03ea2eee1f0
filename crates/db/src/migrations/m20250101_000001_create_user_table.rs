//! Create user table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(User::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(User::Username).string_len(128).not_null())
                    .col(ColumnDef::new(User::UsernameLower).string_len(128).not_null())
                    .col(ColumnDef::new(User::Token).string_len(64))
                    .col(ColumnDef::new(User::Bio).text())
                    .col(ColumnDef::new(User::Location).string_len(256))
                    .col(ColumnDef::new(User::AvatarUrl).string_len(1024))
                    .col(ColumnDef::new(User::HeaderUrl).string_len(1024))
                    .col(ColumnDef::new(User::FollowersCount).integer().not_null().default(0))
                    .col(ColumnDef::new(User::FollowingCount).integer().not_null().default(0))
                    .col(ColumnDef::new(User::MessagesCount).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(User::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: username_lower (usernames are case-insensitively unique)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_username_lower")
                    .table(User::Table)
                    .col(User::UsernameLower)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique index: token
        manager
            .create_index(
                Index::create()
                    .name("idx_user_token")
                    .table(User::Table)
                    .col(User::Token)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_user_created_at")
                    .table(User::Table)
                    .col(User::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    Username,
    UsernameLower,
    Token,
    Bio,
    Location,
    AvatarUrl,
    HeaderUrl,
    FollowersCount,
    FollowingCount,
    MessagesCount,
    CreatedAt,
    UpdatedAt,
}
