use chrono::Utc;
use tracing::info;

use murmur_domain::id::{MicropostId, UserId};
use murmur_domain::pagination::PageRequest;

use crate::domain::policy::authorize_destroy_micropost;
use crate::domain::repository::{MicropostRepository, UserRepository};
use crate::domain::types::{Micropost, User, validate_content};
use crate::error::SocialServiceError;

// ── CreateMicropost ──────────────────────────────────────────────────────────

pub struct CreateMicropostUseCase<M: MicropostRepository> {
    pub repo: M,
}

impl<M: MicropostRepository> CreateMicropostUseCase<M> {
    pub async fn execute(&self, author: &User, content: &str) -> Result<Micropost, SocialServiceError> {
        let content = validate_content(content)?;
        let now = Utc::now();
        let post = Micropost {
            id: MicropostId::generate(),
            user_id: author.id,
            content,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&post).await?;
        Ok(post)
    }
}

// ── DestroyMicropost ─────────────────────────────────────────────────────────

pub struct DestroyMicropostUseCase<M: MicropostRepository> {
    pub repo: M,
}

impl<M: MicropostRepository> DestroyMicropostUseCase<M> {
    pub async fn execute(&self, actor: &User, id: MicropostId) -> Result<(), SocialServiceError> {
        let post = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(SocialServiceError::MicropostNotFound)?;
        authorize_destroy_micropost(actor, &post)?;
        if !self.repo.delete(post.id).await? {
            return Err(SocialServiceError::MicropostNotFound);
        }
        info!(micropost_id = %post.id, user_id = %actor.id, "micropost destroyed");
        Ok(())
    }
}

// ── ListMicroposts ───────────────────────────────────────────────────────────

pub struct ListMicropostsUseCase<U, M>
where
    U: UserRepository,
    M: MicropostRepository,
{
    pub users: U,
    pub microposts: M,
}

impl<U, M> ListMicropostsUseCase<U, M>
where
    U: UserRepository,
    M: MicropostRepository,
{
    /// Newest first.
    pub async fn execute(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<Micropost>, SocialServiceError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(SocialServiceError::UserNotFound);
        }
        self.microposts.list_by_user(user_id, page.clamped()).await
    }
}
