use crate::config::TempoConfig;
use crate::tempo::error::TempoError;
use crate::tempo::types::{CreatedWorklog, WorklogCreate};
use color_eyre::{eyre::eyre, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Tempo REST client carrying the bearer token in its default headers.
#[derive(Clone)]
pub struct TempoClient {
  http: HttpClient,
  base_url: Url,
}

impl TempoClient {
  pub fn new(config: &TempoConfig) -> Result<Self> {
    let base_url = Url::parse(&config.base_url)
      .map_err(|e| eyre!("Invalid Tempo base URL {}: {}", config.base_url, e))?;

    let mut headers = HeaderMap::new();
    let auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
      .map_err(|e| eyre!("Invalid Tempo API token: {}", e))?;
    headers.insert(AUTHORIZATION, auth);
    headers.insert(
      USER_AGENT,
      HeaderValue::from_static(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))),
    );

    let http = HttpClient::builder()
      .default_headers(headers)
      .timeout(REQUEST_TIMEOUT)
      .connect_timeout(CONNECT_TIMEOUT)
      .build()
      .map_err(|e| eyre!("Failed to build Tempo HTTP client: {}", e))?;

    Ok(Self { http, base_url })
  }

  pub async fn create_worklog(&self, worklog: &WorklogCreate) -> Result<CreatedWorklog, TempoError> {
    let response = self
      .http
      .post(self.url_for("worklogs"))
      .json(worklog)
      .send()
      .await?;

    Self::parse_json(response).await
  }

  fn url_for(&self, path: &str) -> String {
    format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
  }

  async fn parse_json<T>(response: Response) -> Result<T, TempoError>
  where
    T: DeserializeOwned,
  {
    let status = response.status();
    if status.is_success() {
      response.json::<T>().await.map_err(TempoError::from)
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
      let body = response.text().await.unwrap_or_default();
      Err(TempoError::Authentication(format!(
        "access denied ({}) - {}",
        status, body
      )))
    } else {
      let body = response.text().await.unwrap_or_default();
      Err(TempoError::Http {
        status,
        message: body,
      })
    }
  }
}
