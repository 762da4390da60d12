//! Migration to create the content table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Content::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Content::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Content::Title)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Content::Body)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Content::Media).string())
                    .col(ColumnDef::new(Content::MediaOriginalName).string())
                    .col(ColumnDef::new(Content::MediaType).string())
                    .col(ColumnDef::new(Content::Author).string().not_null())
                    .col(ColumnDef::new(Content::Departments).string().not_null())
                    .col(
                        ColumnDef::new(Content::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on created_at for the newest-first catalog order
        manager
            .create_index(
                Index::create()
                    .name("idx_content_created_at")
                    .table(Content::Table)
                    .col(Content::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Content::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Content {
    Table,
    Id,
    Title,
    Body,
    Media,
    MediaOriginalName,
    MediaType,
    Author,
    Departments,
    CreatedAt,
}
