//! Migration to create the content_views table.
//!
//! The unique index on (content_id, viewer_email) is load-bearing: the
//! view ledger relies on the store's atomic constraint check to make
//! duplicate view logging a no-op, including under concurrent inserts.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentViews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentViews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ContentViews::ContentId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentViews::ViewerEmail)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentViews::ViewedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_content_views_content_viewer")
                    .table(ContentViews::Table)
                    .col(ContentViews::ContentId)
                    .col(ContentViews::ViewerEmail)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index for per-content log queries ordered by viewed_at
        manager
            .create_index(
                Index::create()
                    .name("idx_content_views_viewed_at")
                    .table(ContentViews::Table)
                    .col(ContentViews::ContentId)
                    .col(ContentViews::ViewedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContentViews::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ContentViews {
    Table,
    Id,
    ContentId,
    ViewerEmail,
    ViewedAt,
}
