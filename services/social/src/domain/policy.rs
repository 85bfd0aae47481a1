//! Stateless authorization rules.
//!
//! Every predicate takes the acting user explicitly. Callers check these before
//! any mutation runs, so a refusal never leaves partial writes behind.

use murmur_domain::id::UserId;

use crate::domain::types::{Micropost, User};
use crate::error::SocialServiceError;

/// Operations exposed to the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SignUp,
    SignIn,
    SignOut,
    ShowUser,
    ListUsers,
    EditProfile,
    UpdateProfile,
    DestroyUser,
    Follow,
    Unfollow,
    ListFollowing,
    ListFollowers,
    CreateMicropost,
    DestroyMicropost,
    Feed,
}

impl Operation {
    /// Whether the operation needs a signed-in actor.
    pub fn requires_authentication(self) -> bool {
        !matches!(
            self,
            Self::SignUp | Self::SignIn | Self::SignOut | Self::ShowUser
        )
    }
}

pub fn can_edit_profile(actor: &User, target: UserId) -> bool {
    actor.id == target
}

/// Admins may destroy anyone but themselves.
pub fn can_destroy_user(actor: &User, target: UserId) -> bool {
    actor.admin && actor.id != target
}

pub fn can_destroy_micropost(actor: &User, post: &Micropost) -> bool {
    actor.id == post.user_id
}

/// Like [`can_edit_profile`], as a typed failure.
pub fn authorize_edit_profile(actor: &User, target: UserId) -> Result<(), SocialServiceError> {
    if can_edit_profile(actor, target) {
        Ok(())
    } else {
        Err(SocialServiceError::Forbidden)
    }
}

/// Like [`can_destroy_user`], but tells an admin's self-destruction attempt apart
/// from a plain refusal. Needs only the target id, so it runs before any lookup.
pub fn authorize_destroy_user(actor: &User, target: UserId) -> Result<(), SocialServiceError> {
    if !actor.admin {
        return Err(SocialServiceError::Forbidden);
    }
    if actor.id == target {
        return Err(SocialServiceError::CannotDestroySelf);
    }
    Ok(())
}

pub fn authorize_destroy_micropost(
    actor: &User,
    post: &Micropost,
) -> Result<(), SocialServiceError> {
    if can_destroy_micropost(actor, post) {
        Ok(())
    } else {
        Err(SocialServiceError::Forbidden)
    }
}
