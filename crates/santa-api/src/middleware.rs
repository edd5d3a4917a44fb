use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::AppState;
use crate::session::clear_session;

/// Resolve the session cookie to a roster participant, or send the visitor
/// back to the login form.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let participant = state
        .session
        .participant(&jar)
        .filter(|p| state.exchange.roster().contains(p));

    match participant {
        Some(participant) => {
            req.extensions_mut().insert(participant);
            next.run(req).await
        }
        None => {
            debug!("No valid session for {}, redirecting to login", req.uri().path());
            (clear_session(jar), Redirect::to("/")).into_response()
        }
    }
}
