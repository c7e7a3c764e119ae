use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::core::moderation::ModerationError;

/// Error on its way out to the caller.
///
/// Only fixed public messages are sent back; details stay in the logs.
#[derive(Debug)]
pub enum ApiError {
    /// The service rejected or failed the invocation
    Moderation(ModerationError),
    /// The body could not be buffered (too large, connection dropped)
    Body(BytesRejection),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Moderation(err) if err.is_caller_error() => StatusCode::BAD_REQUEST,
            ApiError::Moderation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Body(rejection) => rejection.status(),
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::Moderation(ModerationError::MissingCredentials) => {
                "API credentials are not configured on the server."
            }
            ApiError::Moderation(ModerationError::MalformedBody(_)) => {
                "Request body must be valid JSON."
            }
            ApiError::Moderation(ModerationError::MissingImage) => "No image URL or data provided.",
            ApiError::Moderation(ModerationError::InvalidImageData(_)) => {
                "Image data is not valid base64."
            }
            ApiError::Moderation(ModerationError::Upstream(_)) => {
                "Failed to fetch data from Sightengine API."
            }
            ApiError::Body(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                "Request body is too large."
            }
            ApiError::Body(_) => "Failed to read request body.",
        }
    }
}

impl From<ModerationError> for ApiError {
    fn from(err: ModerationError) -> Self {
        ApiError::Moderation(err)
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            match &self {
                ApiError::Moderation(err) => tracing::warn!(%status, "Rejected request: {}", err),
                ApiError::Body(rejection) => {
                    tracing::warn!(%status, "Rejected request body: {}", rejection.body_text())
                }
            }
        }

        let body = Json(ErrorBody {
            error: self.public_message(),
        });

        (status, body).into_response()
    }
}
