/*
 * Responsibility
 * - URL structure under /api
 * - Which routes sit behind the bearer middleware is decided here
 */
use axum::{
    Router,
    routing::{get, put},
};

use crate::api::handlers::{
    health::health,
    posts::{
        create_post, delete_post, get_public_post, list_all_posts, list_my_posts, update_post,
    },
};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route("/posts/all", get(list_all_posts))
        .route("/posts/all/{post_id}", get(get_public_post))
        .route("/posts/public/{post_id}", get(get_public_post));

    let protected = Router::new()
        .route("/posts", get(list_my_posts).post(create_post))
        .route("/posts/{post_id}", put(update_post).delete(delete_post));
    let protected = middleware::auth::access::apply(protected, state);

    public.merge(protected)
}
