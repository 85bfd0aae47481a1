use axum::{
    Json,
    extract::{Query, State},
};

use murmur_domain::pagination::PageRequest;

use crate::error::SocialServiceError;
use crate::handlers::current_user::CurrentUser;
use crate::handlers::micropost::MicropostResponse;
use crate::state::AppState;
use crate::usecase::feed::FeedUseCase;

// ── GET /feed ────────────────────────────────────────────────────────────────

pub async fn get_feed(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<MicropostResponse>>, SocialServiceError> {
    let usecase = FeedUseCase {
        repo: state.micropost_repo(),
    };
    let posts = usecase.execute(&actor, page).await?;
    Ok(Json(posts.into_iter().map(MicropostResponse::from).collect()))
}
