use sea_orm::entity::prelude::*;

/// Account record. `email` is stored lower-cased so the unique index is case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub encrypted_password: Option<String>,
    pub salt: Option<String>,
    pub admin: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::microposts::Entity")]
    Microposts,
}

impl Related<super::microposts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Microposts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
