use reqwest::StatusCode;
use thiserror::Error;

/// Error conditions of a worklog submission. `Http` carries remote
/// rejections such as validation failures; the transport variants cover
/// everything that never produced a response.
#[derive(Debug, Error)]
pub enum TempoError {
  #[error("http {status}: {message}")]
  Http { status: StatusCode, message: String },
  #[error("authentication error: {0}")]
  Authentication(String),
  #[error("request timed out: {0}")]
  Timeout(String),
  #[error("network error: {0}")]
  Network(String),
  #[error("serialization error: {0}")]
  Serialization(String),
  #[error("unexpected error: {0}")]
  Other(String),
}

impl From<reqwest::Error> for TempoError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_timeout() {
      TempoError::Timeout(err.to_string())
    } else if err.is_status() {
      let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
      TempoError::Http {
        status,
        message: err.to_string(),
      }
    } else if err.is_decode() {
      TempoError::Serialization(err.to_string())
    } else if err.is_connect() {
      TempoError::Network(err.to_string())
    } else {
      TempoError::Other(err.to_string())
    }
  }
}
