use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use santa_types::api::LoginForm;

use crate::error::AppError;
use crate::session::{clear_session, session_cookie};
use crate::{AppState, blocking, pages};

pub async fn login_page() -> Html<String> {
    pages::login(None)
}

/// Names are matched case-insensitively. First-time visitors go straight
/// to the wishlist form.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let Some(participant) = state.exchange.login(&form.name) else {
        warn!("Rejected login for unknown name {:?}", form.name.trim());
        return Ok(pages::login(Some("That name is not registered for this exchange."))
            .into_response());
    };

    let token = state.session.create_token(&participant)?;

    let st = state.clone();
    let who = participant.clone();
    let status = blocking(move || Ok(st.exchange.status(&who)?)).await?;

    info!("{} logged in", participant);
    let target = if status.has_wishlist { "/options" } else { "/wishlist" };
    Ok((jar.add(session_cookie(token)), Redirect::to(target)).into_response())
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (clear_session(jar), Redirect::to("/"))
}
