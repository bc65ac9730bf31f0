use reqwest::StatusCode;
use thiserror::Error;

/// Classified outcome of a failed issue lookup.
#[derive(Debug, Error)]
pub enum LookupError {
  #[error("issue not found")]
  NotFound,
  #[error("malformed issue payload: {0}")]
  Malformed(String),
  #[error("network error: {0}")]
  Network(String),
  #[error("request timed out: {0}")]
  Timeout(String),
  #[error("unauthorized")]
  Unauthorized,
  #[error("http {status}: {message}")]
  Api { status: StatusCode, message: String },
  #[error("unexpected error: {0}")]
  Other(String),
}

impl LookupError {
  /// Misses the batch survives: the entry proceeds with the sentinel ID
  /// instead of aborting the run.
  pub fn is_resolution_miss(&self) -> bool {
    matches!(
      self,
      LookupError::NotFound
        | LookupError::Malformed(_)
        | LookupError::Network(_)
        | LookupError::Timeout(_)
    )
  }
}

impl From<gouqi::Error> for LookupError {
  fn from(err: gouqi::Error) -> Self {
    match err {
      gouqi::Error::NotFound => LookupError::NotFound,
      gouqi::Error::Unauthorized => LookupError::Unauthorized,
      gouqi::Error::Fault { code, errors } => LookupError::Api {
        status: code,
        message: format!("{:?}", errors),
      },
      gouqi::Error::Http(e) if e.is_timeout() => LookupError::Timeout(e.to_string()),
      gouqi::Error::Http(e) => LookupError::Network(e.to_string()),
      gouqi::Error::Serde(e) => LookupError::Malformed(e.to_string()),
      other => LookupError::Other(other.to_string()),
    }
  }
}
