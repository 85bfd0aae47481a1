use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Relationships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Relationships::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Relationships::FollowerId).uuid().not_null())
                    .col(ColumnDef::new(Relationships::FollowedId).uuid().not_null())
                    .col(
                        ColumnDef::new(Relationships::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Relationships::Table, Relationships::FollowerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Relationships::Table, Relationships::FollowedId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Backs both the "following" lookup and idempotent follow inserts.
        manager
            .create_index(
                Index::create()
                    .table(Relationships::Table)
                    .col(Relationships::FollowerId)
                    .col(Relationships::FollowedId)
                    .unique()
                    .name("uq_relationships_follower_id_followed_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Relationships::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Relationships {
    Table,
    Id,
    FollowerId,
    FollowedId,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
