use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use murmur_domain::id::{MicropostId, UserId};
use murmur_domain::pagination::PageRequest;

use crate::domain::types::Micropost;
use crate::error::SocialServiceError;
use crate::handlers::current_user::CurrentUser;
use crate::state::AppState;
use crate::usecase::micropost::{
    CreateMicropostUseCase, DestroyMicropostUseCase, ListMicropostsUseCase,
};

#[derive(Serialize)]
pub struct MicropostResponse {
    pub id: MicropostId,
    pub user_id: UserId,
    pub content: String,
    #[serde(serialize_with = "murmur_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "murmur_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Micropost> for MicropostResponse {
    fn from(post: Micropost) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            content: post.content,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

// ── POST /microposts ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateMicropostRequest {
    pub content: String,
}

pub async fn create_micropost(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateMicropostRequest>,
) -> Result<(StatusCode, Json<MicropostResponse>), SocialServiceError> {
    let usecase = CreateMicropostUseCase {
        repo: state.micropost_repo(),
    };
    let post = usecase.execute(&actor, &body.content).await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

// ── DELETE /microposts/{id} ──────────────────────────────────────────────────

pub async fn destroy_micropost(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(micropost_id): Path<MicropostId>,
) -> Result<StatusCode, SocialServiceError> {
    let usecase = DestroyMicropostUseCase {
        repo: state.micropost_repo(),
    };
    usecase.execute(&actor, micropost_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users/{id}/microposts ───────────────────────────────────────────────

pub async fn list_user_microposts(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<MicropostResponse>>, SocialServiceError> {
    let usecase = ListMicropostsUseCase {
        users: state.user_repo(),
        microposts: state.micropost_repo(),
    };
    let posts = usecase.execute(user_id, page).await?;
    Ok(Json(posts.into_iter().map(MicropostResponse::from).collect()))
}
