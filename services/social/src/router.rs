use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use murmur_core::health::{healthz, readyz};
use murmur_core::middleware::request_id_layer;

use crate::handlers::{
    feed::get_feed,
    micropost::{create_micropost, destroy_micropost, list_user_microposts},
    relationship::{follow, list_followers, list_following, unfollow},
    session::{sign_in_with_password, sign_out},
    user::{destroy_user, list_users, show_user, sign_up, update_user},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz::<AppState>))
        // Users
        .route("/users", post(sign_up).get(list_users))
        .route(
            "/users/{id}",
            get(show_user).patch(update_user).delete(destroy_user),
        )
        .route("/users/{id}/microposts", get(list_user_microposts))
        .route("/users/{id}/following", get(list_following))
        .route("/users/{id}/followers", get(list_followers))
        // Sessions
        .route("/sessions", post(sign_in_with_password).delete(sign_out))
        // Microposts
        .route("/microposts", post(create_micropost))
        .route("/microposts/{id}", delete(destroy_micropost))
        // Relationships
        .route("/relationships", post(follow))
        .route("/relationships/{followed_id}", delete(unfollow))
        // Feed
        .route("/feed", get(get_feed))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
