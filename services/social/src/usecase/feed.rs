use murmur_domain::pagination::PageRequest;

use crate::domain::repository::MicropostRepository;
use crate::domain::types::{Micropost, User};
use crate::error::SocialServiceError;

/// The actor's own posts merged with posts from everyone they follow.
///
/// Computed from the current graph on every call, so follows and unfollows are
/// visible immediately.
pub struct FeedUseCase<M: MicropostRepository> {
    pub repo: M,
}

impl<M: MicropostRepository> FeedUseCase<M> {
    pub async fn execute(
        &self,
        actor: &User,
        page: PageRequest,
    ) -> Result<Vec<Micropost>, SocialServiceError> {
        self.repo.feed(actor.id, page.clamped()).await
    }
}
