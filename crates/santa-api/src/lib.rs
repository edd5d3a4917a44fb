pub mod assignment;
pub mod auth;
pub mod error;
pub mod middleware;
pub mod pages;
pub mod session;
pub mod wishlist;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tracing::error;

use santa_db::Exchange;

use crate::error::AppError;
use crate::middleware::require_session;
use crate::session::SessionConfig;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub exchange: Exchange,
    pub session: SessionConfig,
}

impl AppStateInner {
    pub fn new(exchange: Exchange, session: SessionConfig) -> AppState {
        Arc::new(Self { exchange, session })
    }
}

/// All routes, with session checks on everything past the login form.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/wishlist", get(wishlist::edit_wishlist).post(wishlist::save_wishlist))
        .route("/options", get(assignment::options))
        .route("/assign", post(assignment::assign))
        .route("/recipient/wishlist", get(wishlist::recipient_wishlist))
        .layer(axum::middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Run store work off the async runtime.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        AppError::Internal(e.to_string())
    })?
}
