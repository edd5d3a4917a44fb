use axum::{Extension, extract::State, response::Html};

use santa_types::Participant;

use crate::error::AppError;
use crate::{AppState, blocking, pages};

pub async fn options(
    State(state): State<AppState>,
    Extension(participant): Extension<Participant>,
) -> Result<Html<String>, AppError> {
    let st = state.clone();
    let who = participant.clone();
    let status = blocking(move || Ok(st.exchange.status(&who)?)).await?;
    Ok(pages::options(&participant, &status))
}

/// Draw a recipient, or show the one already drawn.
pub async fn assign(
    State(state): State<AppState>,
    Extension(participant): Extension<Participant>,
) -> Result<Html<String>, AppError> {
    let st = state.clone();
    let who = participant.clone();
    let recipient = blocking(move || Ok(st.exchange.assign(&who)?)).await?;
    Ok(pages::assigned(&participant, &recipient))
}
