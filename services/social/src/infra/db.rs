use std::collections::HashMap;

use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, OnConflict, Query},
};
use uuid::Uuid;

use murmur_core::sea_ext::DbErrExt as _;
use murmur_domain::id::{MicropostId, UserId};
use murmur_domain::pagination::PageRequest;
use murmur_social_schema::{microposts, relationships, users};

use crate::domain::repository::{MicropostRepository, RelationshipRepository, UserRepository};
use crate::domain::types::{
    FollowCounts, Micropost, PasswordDigest, Rule, User, ValidationErrors,
};
use crate::error::SocialServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

/// The only unique key a write can trip is `users.email`.
fn user_write_error(err: DbErr, action: &'static str) -> SocialServiceError {
    if err.is_unique_violation() {
        return ValidationErrors::single("email", Rule::Taken).into();
    }
    if matches!(err, DbErr::RecordNotUpdated) {
        return SocialServiceError::UserNotFound;
    }
    anyhow::Error::new(err).context(action).into()
}

fn user_active_model(user: &User) -> users::ActiveModel {
    let (salt, encrypted_password) = match user.password {
        Some(ref digest) => (
            Some(digest.salt.clone()),
            Some(digest.encrypted_password.clone()),
        ),
        None => (None, None),
    };
    users::ActiveModel {
        id: Set(user.id.0),
        name: Set(user.name.clone()),
        email: Set(user.email.clone()),
        encrypted_password: Set(encrypted_password),
        salt: Set(salt),
        admin: Set(user.admin),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
    }
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, SocialServiceError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, SocialServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, SocialServiceError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn create(&self, user: &User) -> Result<(), SocialServiceError> {
        user_active_model(user)
            .insert(&self.db)
            .await
            .map_err(|e| user_write_error(e, "create user"))?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), SocialServiceError> {
        let mut am = user_active_model(user);
        am.created_at = sea_orm::ActiveValue::NotSet;
        am.update(&self.db)
            .await
            .map_err(|e| user_write_error(e, "update user"))?;
        Ok(())
    }

    async fn destroy_cascade(&self, id: UserId) -> Result<bool, SocialServiceError> {
        let id = id.0;
        let deleted = self
            .db
            .transaction::<_, u64, DbErr>(|txn| {
                Box::pin(async move {
                    microposts::Entity::delete_many()
                        .filter(microposts::Column::UserId.eq(id))
                        .exec(txn)
                        .await?;
                    relationships::Entity::delete_many()
                        .filter(
                            Condition::any()
                                .add(relationships::Column::FollowerId.eq(id))
                                .add(relationships::Column::FollowedId.eq(id)),
                        )
                        .exec(txn)
                        .await?;
                    let result = users::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(result.rows_affected)
                })
            })
            .await
            .context("destroy user")?;
        Ok(deleted > 0)
    }
}

fn user_from_model(model: users::Model) -> User {
    let password = match (model.salt, model.encrypted_password) {
        (Some(salt), Some(encrypted_password)) => Some(PasswordDigest {
            salt,
            encrypted_password,
        }),
        _ => None,
    };
    User {
        id: UserId(model.id),
        name: model.name,
        email: model.email,
        password,
        admin: model.admin,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Relationship repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRelationshipRepository {
    pub db: DatabaseConnection,
}

impl DbRelationshipRepository {
    /// Load users by id, keeping the order of `ids`.
    async fn users_in_order(&self, ids: Vec<Uuid>) -> Result<Vec<User>, SocialServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut by_id: HashMap<Uuid, users::Model> = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.clone()))
            .all(&self.db)
            .await
            .context("load related users")?
            .into_iter()
            .map(|model| (model.id, model))
            .collect();
        Ok(ids
            .into_iter()
            .filter_map(|id| by_id.remove(&id))
            .map(user_from_model)
            .collect())
    }
}

impl RelationshipRepository for DbRelationshipRepository {
    async fn follow(&self, follower: UserId, followed: UserId) -> Result<bool, SocialServiceError> {
        let edge = relationships::ActiveModel {
            id: Set(Uuid::now_v7()),
            follower_id: Set(follower.0),
            followed_id: Set(followed.0),
            created_at: Set(chrono::Utc::now()),
        };
        let inserted = relationships::Entity::insert(edge)
            .on_conflict(
                OnConflict::columns([
                    relationships::Column::FollowerId,
                    relationships::Column::FollowedId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|err| {
                // Either endpoint vanished after the caller looked it up.
                if err.is_foreign_key_violation() {
                    SocialServiceError::UserNotFound
                } else {
                    anyhow::Error::new(err).context("follow").into()
                }
            })?;
        Ok(inserted > 0)
    }

    async fn unfollow(
        &self,
        follower: UserId,
        followed: UserId,
    ) -> Result<bool, SocialServiceError> {
        let result = relationships::Entity::delete_many()
            .filter(relationships::Column::FollowerId.eq(follower.0))
            .filter(relationships::Column::FollowedId.eq(followed.0))
            .exec(&self.db)
            .await
            .context("unfollow")?;
        Ok(result.rows_affected > 0)
    }

    async fn is_following(
        &self,
        follower: UserId,
        followed: UserId,
    ) -> Result<bool, SocialServiceError> {
        let count = relationships::Entity::find()
            .filter(relationships::Column::FollowerId.eq(follower.0))
            .filter(relationships::Column::FollowedId.eq(followed.0))
            .count(&self.db)
            .await
            .context("check following")?;
        Ok(count > 0)
    }

    async fn following(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<User>, SocialServiceError> {
        let edges = relationships::Entity::find()
            .filter(relationships::Column::FollowerId.eq(user.0))
            .order_by_asc(relationships::Column::CreatedAt)
            .order_by_asc(relationships::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list following edges")?;
        self.users_in_order(edges.into_iter().map(|e| e.followed_id).collect())
            .await
    }

    async fn followers(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<User>, SocialServiceError> {
        let edges = relationships::Entity::find()
            .filter(relationships::Column::FollowedId.eq(user.0))
            .order_by_asc(relationships::Column::CreatedAt)
            .order_by_asc(relationships::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list follower edges")?;
        self.users_in_order(edges.into_iter().map(|e| e.follower_id).collect())
            .await
    }

    async fn counts(&self, user: UserId) -> Result<FollowCounts, SocialServiceError> {
        let following = relationships::Entity::find()
            .filter(relationships::Column::FollowerId.eq(user.0))
            .count(&self.db)
            .await
            .context("count following")?;
        let followers = relationships::Entity::find()
            .filter(relationships::Column::FollowedId.eq(user.0))
            .count(&self.db)
            .await
            .context("count followers")?;
        Ok(FollowCounts {
            following,
            followers,
        })
    }
}

// ── Micropost repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMicropostRepository {
    pub db: DatabaseConnection,
}

impl MicropostRepository for DbMicropostRepository {
    async fn create(&self, post: &Micropost) -> Result<(), SocialServiceError> {
        microposts::ActiveModel {
            id: Set(post.id.0),
            user_id: Set(post.user_id.0),
            content: Set(post.content.clone()),
            created_at: Set(post.created_at),
            updated_at: Set(post.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create micropost")?;
        Ok(())
    }

    async fn find_by_id(&self, id: MicropostId) -> Result<Option<Micropost>, SocialServiceError> {
        let model = microposts::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find micropost by id")?;
        Ok(model.map(micropost_from_model))
    }

    async fn delete(&self, id: MicropostId) -> Result<bool, SocialServiceError> {
        let result = microposts::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete micropost")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_by_user(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<Micropost>, SocialServiceError> {
        let models = microposts::Entity::find()
            .filter(microposts::Column::UserId.eq(user.0))
            .order_by_desc(microposts::Column::CreatedAt)
            .order_by_desc(microposts::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list microposts by user")?;
        Ok(models.into_iter().map(micropost_from_model).collect())
    }

    async fn feed(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<Micropost>, SocialServiceError> {
        let followed_ids = Query::select()
            .column(relationships::Column::FollowedId)
            .from(relationships::Entity)
            .and_where(Expr::col(relationships::Column::FollowerId).eq(user.0))
            .to_owned();
        let models = microposts::Entity::find()
            .filter(
                Condition::any()
                    .add(microposts::Column::UserId.eq(user.0))
                    .add(microposts::Column::UserId.in_subquery(followed_ids)),
            )
            .order_by_desc(microposts::Column::CreatedAt)
            .order_by_desc(microposts::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("load feed")?;
        Ok(models.into_iter().map(micropost_from_model).collect())
    }
}

fn micropost_from_model(model: microposts::Model) -> Micropost {
    Micropost {
        id: MicropostId(model.id),
        user_id: UserId(model.user_id),
        content: model.content,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
