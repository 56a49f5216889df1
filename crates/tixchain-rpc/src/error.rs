use std::convert::Infallible;

use chrono::{SecondsFormat, Utc};
use thiserror::Error;
use tixchain_core::CoreError;
use tracing::{error, warn};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::dto::ErrorResponse;
use crate::export::ExportError;

/// Failures raised by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Export(#[from] ExportError),

    /// The blocking append task panicked or was cancelled.
    #[error("Append task failed: {0}")]
    Task(String),
}

impl warp::reject::Reject for ApiError {}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(CoreError::BlockNotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Core(CoreError::ImmutableChain { .. }) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Core(CoreError::DigestUnavailable)
            | ApiError::Export(_)
            | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Turn any rejection into a JSON error body.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(api) = err.find::<ApiError>() {
        (api.status(), api.to_string())
    } else if let Some(body) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, body.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Resource not found".to_string())
    } else {
        error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    if status.is_server_error() {
        error!("{}", message);
    } else {
        warn!("{}", message);
    }

    let body = ErrorResponse {
        status: status.as_u16(),
        error: status.canonical_reason().unwrap_or("Error").to_string(),
        message,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
