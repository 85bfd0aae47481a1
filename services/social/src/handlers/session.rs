use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::error::SocialServiceError;
use crate::handlers::cookie::clear_remember_cookie;
use crate::handlers::user::{AccountResponse, sign_in};
use crate::state::AppState;
use crate::usecase::credential::AuthenticatePasswordUseCase;

// ── POST /sessions ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

pub async fn sign_in_with_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SignInRequest>,
) -> Result<impl IntoResponse, SocialServiceError> {
    let usecase = AuthenticatePasswordUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&body.email, &body.password).await?;
    let jar = sign_in(jar, &state, &user)?;
    Ok((StatusCode::CREATED, jar, Json(AccountResponse::from(user))))
}

// ── DELETE /sessions ─────────────────────────────────────────────────────────

/// Clears the cookie even when it no longer authenticates anyone.
pub async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (StatusCode::NO_CONTENT, clear_remember_cookie(jar, &state.cookie))
}
