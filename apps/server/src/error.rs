use std::io::Error as IoError;

use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;
use thiserror::Error;
use watchpost::monitoring::history::HistoryError;
use watchpost::persistence::ExportError;

/// Startup failures. Any of these abort the process before monitoring runs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0:#}")]
    Io(#[from] IoError),
    #[error("invalid configuration: {0}")]
    Config(#[from] watchpost::ConfigError),
    #[error("{0:#}")]
    Startup(#[from] anyhow::Error),
}

/// Handler failures, mapped onto HTTP statuses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl From<HistoryError> for ApiError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::UnknownTarget(name) => {
                ApiError::NotFound(format!("URL not found: {name}"))
            }
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::History(e) => e.into(),
            ExportError::Csv(detail) => ApiError::Internal(detail),
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "detail": self.to_string() }))
    }
}
