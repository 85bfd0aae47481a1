#![allow(async_fn_in_trait)]

use murmur_domain::id::{MicropostId, UserId};
use murmur_domain::pagination::PageRequest;

use crate::domain::types::{FollowCounts, Micropost, User};
use crate::error::SocialServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, SocialServiceError>;

    /// `email` must already be normalized (see `normalize_email`).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, SocialServiceError>;

    /// Users in creation order.
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, SocialServiceError>;

    /// Insert a new user. A concurrent insert of the same email surfaces as a
    /// `Validation` error with `email: taken`.
    async fn create(&self, user: &User) -> Result<(), SocialServiceError>;

    /// Persist profile fields, credentials and `updated_at`. Same email rule as `create`.
    async fn update(&self, user: &User) -> Result<(), SocialServiceError>;

    /// Delete the user together with their microposts and every follow edge
    /// touching them, in one transaction. Returns `false` if no such user.
    async fn destroy_cascade(&self, id: UserId) -> Result<bool, SocialServiceError>;
}

/// Repository for directed follow edges.
pub trait RelationshipRepository: Send + Sync {
    /// Create the edge if absent. Returns `true` if a new edge was written.
    async fn follow(&self, follower: UserId, followed: UserId) -> Result<bool, SocialServiceError>;

    /// Remove the edge if present. Returns `true` if an edge was deleted.
    async fn unfollow(
        &self,
        follower: UserId,
        followed: UserId,
    ) -> Result<bool, SocialServiceError>;

    async fn is_following(
        &self,
        follower: UserId,
        followed: UserId,
    ) -> Result<bool, SocialServiceError>;

    /// Users `user` follows, oldest edge first.
    async fn following(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<User>, SocialServiceError>;

    /// Users following `user`, oldest edge first.
    async fn followers(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<User>, SocialServiceError>;

    async fn counts(&self, user: UserId) -> Result<FollowCounts, SocialServiceError>;
}

/// Repository for microposts, including the feed query.
pub trait MicropostRepository: Send + Sync {
    async fn create(&self, post: &Micropost) -> Result<(), SocialServiceError>;

    async fn find_by_id(&self, id: MicropostId) -> Result<Option<Micropost>, SocialServiceError>;

    /// Hard delete. Returns `true` if a row was deleted.
    async fn delete(&self, id: MicropostId) -> Result<bool, SocialServiceError>;

    /// Posts authored by `user`, newest first.
    async fn list_by_user(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<Micropost>, SocialServiceError>;

    /// Posts by `user` or anyone `user` currently follows, newest first.
    async fn feed(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<Micropost>, SocialServiceError>;
}
