use tracing::info;

use murmur_domain::id::UserId;
use murmur_domain::pagination::PageRequest;

use crate::domain::repository::{RelationshipRepository, UserRepository};
use crate::domain::types::User;
use crate::error::SocialServiceError;

async fn ensure_user_exists<U: UserRepository>(
    users: &U,
    id: UserId,
) -> Result<(), SocialServiceError> {
    match users.find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(SocialServiceError::UserNotFound),
    }
}

// ── Follow ───────────────────────────────────────────────────────────────────

pub struct FollowUseCase<U, G>
where
    U: UserRepository,
    G: RelationshipRepository,
{
    pub users: U,
    pub relationships: G,
}

impl<U, G> FollowUseCase<U, G>
where
    U: UserRepository,
    G: RelationshipRepository,
{
    /// Idempotent. Returns `true` when a new edge was created.
    pub async fn execute(&self, actor: &User, followed: UserId) -> Result<bool, SocialServiceError> {
        ensure_user_exists(&self.users, followed).await?;
        let created = self.relationships.follow(actor.id, followed).await?;
        if created {
            info!(follower_id = %actor.id, followed_id = %followed, "followed");
        }
        Ok(created)
    }
}

// ── Unfollow ─────────────────────────────────────────────────────────────────

pub struct UnfollowUseCase<G: RelationshipRepository> {
    pub repo: G,
}

impl<G: RelationshipRepository> UnfollowUseCase<G> {
    /// No-op when the edge is absent. Returns `true` when an edge was removed.
    pub async fn execute(&self, actor: &User, followed: UserId) -> Result<bool, SocialServiceError> {
        let removed = self.repo.unfollow(actor.id, followed).await?;
        if removed {
            info!(follower_id = %actor.id, followed_id = %followed, "unfollowed");
        }
        Ok(removed)
    }
}

// ── IsFollowing ──────────────────────────────────────────────────────────────

pub struct IsFollowingUseCase<G: RelationshipRepository> {
    pub repo: G,
}

impl<G: RelationshipRepository> IsFollowingUseCase<G> {
    pub async fn execute(
        &self,
        follower: UserId,
        followed: UserId,
    ) -> Result<bool, SocialServiceError> {
        self.repo.is_following(follower, followed).await
    }
}

// ── ListFollowing / ListFollowers ────────────────────────────────────────────

/// Which side of the graph to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Following,
    Followers,
}

pub struct ListConnectionsUseCase<U, G>
where
    U: UserRepository,
    G: RelationshipRepository,
{
    pub users: U,
    pub relationships: G,
}

impl<U, G> ListConnectionsUseCase<U, G>
where
    U: UserRepository,
    G: RelationshipRepository,
{
    /// Oldest edge first.
    pub async fn execute(
        &self,
        user_id: UserId,
        direction: Direction,
        page: PageRequest,
    ) -> Result<Vec<User>, SocialServiceError> {
        ensure_user_exists(&self.users, user_id).await?;
        let page = page.clamped();
        match direction {
            Direction::Following => self.relationships.following(user_id, page).await,
            Direction::Followers => self.relationships.followers(user_id, page).await,
        }
    }
}
