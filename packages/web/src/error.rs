use api::LogbookError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::views;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Logbook(#[from] LogbookError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Invalid form token")]
    Forbidden,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Logbook(LogbookError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Logbook(LogbookError::InvalidCredentials) => StatusCode::BAD_REQUEST,
            AppError::Logbook(LogbookError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Logbook(_) | AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    /// What the visitor is told. Server-side details stay in the log.
    fn message(&self) -> String {
        match self {
            AppError::Logbook(LogbookError::InvalidCredentials) => views::LOGIN_FAILED.to_string(),
            AppError::Logbook(LogbookError::NotFound) => "Not found.".to_string(),
            AppError::Logbook(e @ LogbookError::Validation(_)) => e.to_string(),
            AppError::Forbidden => "Invalid form token, please reload the page.".to_string(),
            _ => "Something went wrong.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        (status, views::error_page(&self.message())).into_response()
    }
}
