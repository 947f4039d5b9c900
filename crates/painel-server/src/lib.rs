//! painel-server: HTTP API over the record store.
//!
//! | Method   | Path               | Auth | Response |
//! |----------|--------------------|------|----------|
//! | `GET`    | `/api/topics`      |      | `{data: TopicDef[]}` |
//! | `GET`    | `/api/posts`       |      | `{data: Post[]}`, newest first, `?topicId=` filter |
//! | `GET`    | `/api/posts/{id}`  |      | `{data: Post}` |
//! | `POST`   | `/api/posts`       | yes  | `{message, id}` |
//! | `PUT`    | `/api/posts/{id}`  | yes  | `{message, id}` |
//! | `DELETE` | `/api/posts/{id}`  | yes  | `{message, changes}` |
//!
//! Mutating routes require the `x-admin-password` header. Errors are
//! `{error: "..."}` with 400, 401 or 404 (500 if a store task panics).
//! Mutations run on tokio's blocking pool, since the file store writes
//! synchronously.

mod auth;
mod error;
mod routes;

pub use auth::ADMIN_HEADER;
pub use error::ApiError;

use axum::routing::get;
use axum::Router;
use painel_core::PostStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PostStore>,
    pub admin_password: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn PostStore>, admin_password: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            admin_password: admin_password.into(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/topics", get(routes::list_topics))
        .route("/api/posts", get(routes::list_posts).post(routes::create_post))
        .route(
            "/api/posts/{id}",
            get(routes::get_post)
                .put(routes::update_post)
                .delete(routes::delete_post),
        )
        .with_state(state)
}

/// Bind `addr` and serve until ctrl-c.
pub async fn serve(addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, backend = state.store.backend(), "painel API listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
}
