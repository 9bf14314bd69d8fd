use axum::Json;
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use thiserror::Error;

use crate::models::food_form::FormError;
use crate::services::pages::PageError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Malformed submission: {0}")]
    MalformedForm(#[from] FormRejection),

    #[error("Invalid submission: {0}")]
    InvalidForm(#[from] FormError),

    #[error("Something went wrong: {0}")]
    Page(#[from] PageError),
}

#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    message: String,
    status: u16,
    #[serde(rename = "statusText")]
    status_text: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let code = self.error_code();
        if code.is_server_error() {
            tracing::error!("{self}");
        }

        let message = Json(ErrorBody {
            ok: false,
            message: self.to_string(),
            status: code.as_u16(),
            status_text: code.canonical_reason().unwrap_or_default().to_string(),
        });

        (code, message).into_response()
    }
}

impl AppError {
    fn error_code(&self) -> StatusCode {
        match self {
            AppError::MalformedForm(_) | AppError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            AppError::Page(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
