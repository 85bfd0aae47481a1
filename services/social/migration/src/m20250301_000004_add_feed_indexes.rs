use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Microposts::Table)
                    .col(Microposts::UserId)
                    .col(Microposts::CreatedAt)
                    .name("idx_microposts_user_id_created_at")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Relationships::Table)
                    .col(Relationships::FollowedId)
                    .name("idx_relationships_followed_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_relationships_followed_id")
                    .table(Relationships::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_microposts_user_id_created_at")
                    .table(Microposts::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Microposts {
    Table,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Relationships {
    Table,
    FollowedId,
}
