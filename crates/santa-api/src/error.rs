use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use santa_db::ExchangeError;
use santa_draw::DrawError;

use crate::pages;

/// Failures a handler can end with. Everything except `Internal` is an
/// expected outcome shown to the participant as a plain message.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("no participants left to assign")]
    Exhausted,

    #[error("participant is not on the roster")]
    UnknownParticipant,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ExchangeError> for AppError {
    fn from(e: ExchangeError) -> Self {
        match e {
            ExchangeError::Draw(DrawError::Exhausted(_)) => AppError::Exhausted,
            ExchangeError::Draw(DrawError::UnknownParticipant(_)) => AppError::UnknownParticipant,
            ExchangeError::Store(e) => AppError::Internal(format!("{:#}", e)),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Exhausted => {
                pages::message("No participants are left to assign.").into_response()
            }
            AppError::UnknownParticipant => (
                StatusCode::FORBIDDEN,
                pages::message("You are not registered for this exchange."),
            )
                .into_response(),
            AppError::Internal(detail) => {
                error!("Request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    pages::message("Something went wrong. Please try again later."),
                )
                    .into_response()
            }
        }
    }
}
