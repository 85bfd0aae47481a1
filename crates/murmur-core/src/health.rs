use axum::extract::State;
use axum::http::StatusCode;
use sea_orm::DatabaseConnection;

/// Liveness probe for `GET /healthz`.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe for `GET /readyz`: 200 once the database answers a ping.
pub async fn readyz<S>(State(state): State<S>) -> StatusCode
where
    S: AsRef<DatabaseConnection> + Send + Sync,
{
    match state.as_ref().ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
