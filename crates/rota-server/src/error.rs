//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body has the shape `{"error": "<message>", "kind": "<kind>"}`.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use rota_core::ErrorKind;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("schedule changes require the rota admin credentials")]
  Unauthorized,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Core(#[from] rota_core::Error),
}

fn status_for(kind: ErrorKind) -> StatusCode {
  match kind {
    ErrorKind::NotFound => StatusCode::NOT_FOUND,
    ErrorKind::Conflict | ErrorKind::InUse => StatusCode::CONFLICT,
    ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
    ErrorKind::SnapshotCorrupt => StatusCode::UNPROCESSABLE_ENTITY,
    ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let message = self.to_string();
    let (status, kind) = match &self {
      ApiError::Unauthorized => {
        let body = json!({ "error": message, "kind": "unauthorized" });
        let mut res = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static(crate::auth::CHALLENGE),
        );
        return res;
      }
      ApiError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorKind::NotFound),
      ApiError::BadRequest(_) => {
        (StatusCode::BAD_REQUEST, ErrorKind::InvalidInput)
      }
      ApiError::Core(e) => (status_for(e.kind()), e.kind()),
    };

    if status.is_server_error() {
      error!(error = %message, "request failed");
    }
    (status, Json(json!({ "error": message, "kind": kind }))).into_response()
  }
}
