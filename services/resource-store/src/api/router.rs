//! 路由

use axum::Router;
use axum::routing::{get, post, put};

use super::handlers::{auth, health, resources, users};
use super::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz/", get(health::healthz))
        .route("/metrics", get(health::metrics))
        .route("/auth/token", post(auth::issue_token))
        .route("/users/", post(users::create_user))
        .route("/users/me", get(users::me))
        .route(
            "/users/{id}/roles/{role}",
            put(users::grant_role).delete(users::revoke_role),
        )
        .route(
            "/resources/",
            post(resources::create).get(resources::list),
        )
        .route(
            "/resources/{id}/",
            get(resources::retrieve)
                .patch(resources::update)
                .put(resources::replace)
                .delete(resources::delete),
        )
        .with_state(state)
}
