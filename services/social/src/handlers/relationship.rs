use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use murmur_domain::id::UserId;
use murmur_domain::pagination::PageRequest;

use crate::error::SocialServiceError;
use crate::handlers::current_user::CurrentUser;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::relationship::{
    Direction, FollowUseCase, ListConnectionsUseCase, UnfollowUseCase,
};

// ── POST /relationships ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct FollowRequest {
    pub followed_id: UserId,
}

#[derive(Serialize)]
pub struct FollowResponse {
    pub followed_id: UserId,
    pub following: bool,
}

/// 201 for a new edge, 200 when it already existed.
pub async fn follow(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<FollowRequest>,
) -> Result<(StatusCode, Json<FollowResponse>), SocialServiceError> {
    let usecase = FollowUseCase {
        users: state.user_repo(),
        relationships: state.relationship_repo(),
    };
    let created = usecase.execute(&actor, body.followed_id).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(FollowResponse {
        followed_id: body.followed_id,
        following: true,
    })))
}

// ── DELETE /relationships/{followed_id} ──────────────────────────────────────

pub async fn unfollow(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(followed_id): Path<UserId>,
) -> Result<StatusCode, SocialServiceError> {
    let usecase = UnfollowUseCase {
        repo: state.relationship_repo(),
    };
    usecase.execute(&actor, followed_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users/{id}/following, GET /users/{id}/followers ─────────────────────

async fn list_connections(
    state: AppState,
    user_id: UserId,
    direction: Direction,
    page: PageRequest,
) -> Result<Json<Vec<UserResponse>>, SocialServiceError> {
    let usecase = ListConnectionsUseCase {
        users: state.user_repo(),
        relationships: state.relationship_repo(),
    };
    let users = usecase.execute(user_id, direction, page).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn list_following(
    CurrentUser(_actor): CurrentUser,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<UserResponse>>, SocialServiceError> {
    list_connections(state, user_id, Direction::Following, page).await
}

pub async fn list_followers(
    CurrentUser(_actor): CurrentUser,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<UserResponse>>, SocialServiceError> {
    list_connections(state, user_id, Direction::Followers, page).await
}
