use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::*;

use crate::fetcher::FetchError;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Method Not Allowed")]
    InvalidMethod,
    #[error("URL parameter is missing or invalid")]
    MissingParameter,
    #[error("Invalid URL format")]
    MalformedUrl,
    #[error("Failed to retrieve video details.")]
    UpstreamFetchFailure(#[from] FetchError),
    #[error("Could not find a video source on the provided page.")]
    NoVideoFound,
    #[error("Unexpected error while processing the page.")]
    Unexpected(String),
}

impl ResolveError {
    pub fn status(&self) -> StatusCode {
        match self {
            ResolveError::InvalidMethod => StatusCode::METHOD_NOT_ALLOWED,
            ResolveError::MissingParameter | ResolveError::MalformedUrl => StatusCode::BAD_REQUEST,
            ResolveError::NoVideoFound => StatusCode::NOT_FOUND,
            ResolveError::UpstreamFetchFailure(_) | ResolveError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn details(&self) -> Option<String> {
        match self {
            ResolveError::UpstreamFetchFailure(e) => Some(e.to_string()),
            ResolveError::Unexpected(details) => Some(details.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        let status = self.status();
        let json = match self.details() {
            Some(details) => json!({ "error": self.to_string(), "details": details }),
            None => json!({ "error": self.to_string() }),
        };
        if status.is_server_error() {
            warn!("Returning http error {status}: {json}");
        } else {
            info!("Returning http error {status}: {json}");
        }
        (status, Json(json)).into_response()
    }
}
