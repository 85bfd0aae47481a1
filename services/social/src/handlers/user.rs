use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use murmur_domain::id::UserId;
use murmur_domain::pagination::PageRequest;

use crate::domain::types::{RememberToken, User};
use crate::error::SocialServiceError;
use crate::handlers::cookie::set_remember_cookie;
use crate::handlers::current_user::CurrentUser;
use crate::handlers::micropost::MicropostResponse;
use crate::state::AppState;
use crate::usecase::relationship::IsFollowingUseCase;
use crate::usecase::user::{
    DestroyUserUseCase, ListUsersUseCase, ShowUserUseCase, SignUpInput, SignUpUseCase,
    UpdateUserInput, UpdateUserUseCase,
};

/// Public view of a user.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub admin: bool,
    #[serde(serialize_with = "murmur_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            admin: user.admin,
            created_at: user.created_at,
        }
    }
}

/// The signed-in user's own view, including the email.
#[derive(Serialize)]
pub struct AccountResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub admin: bool,
    #[serde(serialize_with = "murmur_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "murmur_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for AccountResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            admin: user.admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Issue a remember cookie for `user`. Every persisted user has a salt.
pub(crate) fn sign_in(
    jar: CookieJar,
    state: &AppState,
    user: &User,
) -> Result<CookieJar, SocialServiceError> {
    let token = RememberToken::for_user(user).ok_or(SocialServiceError::InvalidCredentials)?;
    Ok(set_remember_cookie(jar, &state.cookie, &token))
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Refused for clients that are already signed in.
pub async fn sign_up(
    viewer: Option<CurrentUser>,
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SignUpRequest>,
) -> Result<impl IntoResponse, SocialServiceError> {
    if viewer.is_some() {
        return Err(SocialServiceError::Forbidden);
    }
    let usecase = SignUpUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(SignUpInput {
            name: body.name,
            email: body.email,
            password: body.password,
            password_confirmation: body.password_confirmation,
        })
        .await?;
    let jar = sign_in(jar, &state, &user)?;
    Ok((StatusCode::CREATED, jar, Json(AccountResponse::from(user))))
}

// ── GET /users ───────────────────────────────────────────────────────────────

pub async fn list_users(
    CurrentUser(_actor): CurrentUser,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<UserResponse>>, SocialServiceError> {
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let users = usecase.execute(page).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub following_count: u64,
    pub followers_count: u64,
    pub microposts: Vec<MicropostResponse>,
    /// Present only for a signed-in viewer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

pub async fn show_user(
    viewer: Option<CurrentUser>,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(page): Query<PageRequest>,
) -> Result<Json<ProfileResponse>, SocialServiceError> {
    let usecase = ShowUserUseCase {
        users: state.user_repo(),
        relationships: state.relationship_repo(),
        microposts: state.micropost_repo(),
    };
    let profile = usecase.execute(user_id, page.clamped()).await?;
    let is_following = match viewer {
        Some(CurrentUser(viewer)) => {
            let check = IsFollowingUseCase {
                repo: state.relationship_repo(),
            };
            Some(check.execute(viewer.id, user_id).await?)
        }
        None => None,
    };
    Ok(Json(ProfileResponse {
        user: profile.user.into(),
        following_count: profile.counts.following,
        followers_count: profile.counts.followers,
        microposts: profile
            .microposts
            .into_iter()
            .map(MicropostResponse::from)
            .collect(),
        is_following,
    }))
}

// ── PATCH /users/{id} ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

/// A password change rotates the salt, so the caller gets a fresh cookie.
pub async fn update_user(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    jar: CookieJar,
    Path(user_id): Path<UserId>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, SocialServiceError> {
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(&actor, user_id, UpdateUserInput {
            name: body.name,
            email: body.email,
            password: body.password,
            password_confirmation: body.password_confirmation,
        })
        .await?;
    let jar = sign_in(jar, &state, &user)?;
    Ok((jar, Json(AccountResponse::from(user))))
}

// ── DELETE /users/{id} ───────────────────────────────────────────────────────

pub async fn destroy_user(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<StatusCode, SocialServiceError> {
    let usecase = DestroyUserUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(&actor, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
