// routes.rs - Route table for the three handler tiers

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn app(state: Arc<AppState>, config: &AppConfig) -> Router {
    let mut router = Router::new()
        .merge(public_routes())
        .merge(user_routes())
        .merge(board_routes())
        .merge(post_routes())
        .merge(comment_routes())
        .merge(admin_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn public_routes() -> Router<Arc<AppState>> {
    use handlers::public::{health, popular};

    Router::new()
        .route("/", get(popular::popular_posts))
        .route("/health", get(health::health_get))
}

fn user_routes() -> Router<Arc<AppState>> {
    use handlers::protected::users as write;
    use handlers::public::{popular, users as read};

    Router::new()
        .route("/users", get(read::user_list).post(read::user_register))
        .route("/users/search", get(read::user_search))
        .route("/users/popular", get(popular::popular_users))
        .route(
            "/users/:id",
            get(read::user_get).put(write::user_update).delete(write::user_delete),
        )
}

fn board_routes() -> Router<Arc<AppState>> {
    use handlers::protected::boards as write;
    use handlers::public::boards as read;

    Router::new()
        .route("/boards", get(read::board_list).post(write::board_create))
        .route("/boards/search", get(read::board_search))
        .route(
            "/boards/:id",
            get(read::board_get).put(write::board_update).delete(write::board_delete),
        )
}

fn post_routes() -> Router<Arc<AppState>> {
    use handlers::protected::posts as write;
    use handlers::public::posts as read;

    Router::new()
        .route("/boards/:id/posts", get(read::post_list).post(write::post_create))
        .route("/boards/:id/posts/search", get(read::post_search))
        .route(
            "/boards/:id/posts/:post_id",
            get(read::post_get).put(write::post_update).delete(write::post_delete),
        )
}

fn comment_routes() -> Router<Arc<AppState>> {
    use handlers::protected::comments as write;
    use handlers::public::comments as read;

    Router::new()
        .route(
            "/boards/:id/posts/:post_id/comments",
            get(read::comment_list).post(write::comment_create),
        )
        .route(
            "/boards/:id/posts/:post_id/comments/:comment_id",
            get(read::comment_get)
                .put(write::comment_update)
                .delete(write::comment_delete),
        )
}

fn admin_routes() -> Router<Arc<AppState>> {
    use handlers::elevated::{admins, transfer};

    Router::new()
        .route("/export", post(transfer::export_post))
        .route("/import", post(transfer::import_post))
        .route("/admins/:user_id", put(admins::admin_grant).delete(admins::admin_revoke))
}
