use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;

/// Fatal conversion failure: the attachment bytes cannot be read as tabular
/// data at all. Row-level problems never produce this; they go to the
/// anomaly log instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
  pub message: String,
}

impl FormatError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

impl std::fmt::Display for FormatError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "format error: {}", self.message)
  }
}

impl std::error::Error for FormatError {}

#[derive(Debug)]
pub enum ApiError {
  BadRequest(String),
  BadRequestWithCode {
    code: String,
    message: String,
  },
  Internal(String),
}

impl ApiError {
  pub fn internal<E: std::fmt::Display>(err: E) -> Self {
    Self::Internal(err.to_string())
  }

  pub fn bad_request_with_code(
    code: impl Into<String>,
    message: impl Into<String>,
  ) -> Self {
    Self::BadRequestWithCode {
      code: code.into(),
      message: message.into(),
    }
  }
}

impl From<FormatError> for ApiError {
  fn from(err: FormatError) -> Self {
    ApiError::bad_request_with_code("FORMAT_ERROR", err.message)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, code, message) = match self {
      ApiError::BadRequest(message) => (
        StatusCode::BAD_REQUEST,
        "BAD_REQUEST".to_string(),
        message,
      ),
      ApiError::BadRequestWithCode { code, message } => {
        (StatusCode::BAD_REQUEST, code, message)
      }
      ApiError::Internal(message) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR".to_string(),
        message,
      ),
    };

    let body = Json(json!({
      "error": {
        "code": code,
        "message": message
      }
    }));

    (status, body).into_response()
  }
}
