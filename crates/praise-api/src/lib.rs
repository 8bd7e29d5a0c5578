pub mod admin;
pub mod auth;
pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod password;
pub mod praise;
pub mod seed;
pub mod state;
pub mod teachers;
pub mod token;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
};

use crate::middleware::{require_admin, require_auth};
use crate::state::AppState;

/// Build the full HTTP surface. CORS and request tracing are layered on by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/teachers", get(teachers::list_teachers))
        .route("/teachers/{teacher_id}", get(teachers::get_teacher))
        .route("/auth/login", post(auth::login))
        .route("/praise", post(praise::create_praise));

    let teacher_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/praise/teacher/{teacher_id}", get(praise::teacher_praises));

    let admin_routes = Router::new()
        .route("/admin/stats", get(admin::stats))
        .route("/admin/teachers", post(admin::create_teacher))
        .route("/admin/teachers/{teacher_id}", put(admin::update_teacher))
        .route("/admin/teachers/{teacher_id}", delete(admin::delete_teacher))
        .route("/admin/praises", get(admin::list_praises))
        .route("/admin/praises/{praise_id}", delete(admin::delete_praise))
        .layer(from_fn(require_admin));

    // require_auth is the outer layer, so it runs before require_admin.
    let protected_routes = teacher_routes
        .merge(admin_routes)
        .layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
