use api_shared::ErrorRes;
use axum::{
    extract::rejection::JsonRejection,
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use confess_core::ConfessionError;
use std::any::Any;
use std::time::Duration;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Confession(#[from] ConfessionError),

    #[error("Invalid request body")]
    MalformedPayload(#[from] JsonRejection),

    #[error("Too many requests, please try again later.")]
    RateLimited { retry_after: Duration },

    #[error("Internal Server Error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Confession(err) if err.is_client_fault() => {
                (StatusCode::BAD_REQUEST, Json(ErrorRes::new(err.to_string()))).into_response()
            }
            ApiError::Confession(err) => {
                tracing::error!("Submission pipeline error: {:?}", err);
                internal_error_response()
            }
            ApiError::MalformedPayload(rejection) => {
                tracing::debug!("Malformed payload: {}", rejection.body_text());
                // Status follows the rejection: 400, 413, 415 or 422.
                let status = rejection.status();
                let message = ApiError::MalformedPayload(rejection).to_string();
                (status, Json(ErrorRes::new(message))).into_response()
            }
            ApiError::RateLimited { retry_after } => {
                let message = ApiError::RateLimited { retry_after }.to_string();
                let secs = retry_after.as_secs_f64().ceil().max(1.0) as u64;
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(RETRY_AFTER, HeaderValue::from(secs))],
                    Json(ErrorRes::new(message)),
                )
                    .into_response()
            }
            ApiError::Internal => internal_error_response(),
        }
    }
}

fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorRes::new(INTERNAL_ERROR_MESSAGE)),
    )
        .into_response()
}

/// Response for panics caught by `CatchPanicLayer`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    tracing::error!("Handler panicked: {}", detail);
    ApiError::Internal.into_response()
}
