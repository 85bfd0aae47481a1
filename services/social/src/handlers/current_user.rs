//! Signed-in actor resolved from the remember cookie.

use std::future::Future;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::domain::types::{RememberToken, User};
use crate::error::SocialServiceError;
use crate::handlers::cookie::remember_token;
use crate::infra::db::DbUserRepository;
use crate::state::AppState;
use crate::usecase::credential::AuthenticateRememberUseCase;

/// The authenticated user. Rejects with 401 when the cookie is missing,
/// malformed or stale.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

async fn authenticate(
    repo: DbUserRepository,
    token: Option<RememberToken>,
) -> Result<Option<User>, SocialServiceError> {
    let Some(token) = token else {
        return Ok(None);
    };
    match (AuthenticateRememberUseCase { repo }).execute(&token).await {
        Ok(user) => Ok(Some(user)),
        Err(SocialServiceError::UserNotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

// Values are pulled out of `parts` synchronously so the returned future is
// 'static and does not capture the request borrow.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = SocialServiceError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = remember_token(&CookieJar::from_headers(&parts.headers));
        let repo = state.user_repo();
        async move {
            authenticate(repo, token)
                .await?
                .map(Self)
                .ok_or(SocialServiceError::Unauthorized)
        }
    }
}

/// `Option<CurrentUser>` for routes that also serve anonymous visitors.
impl OptionalFromRequestParts<AppState> for CurrentUser {
    type Rejection = SocialServiceError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let token = remember_token(&CookieJar::from_headers(&parts.headers));
        let repo = state.user_repo();
        async move { Ok(authenticate(repo, token).await?.map(Self)) }
    }
}
