use crate::config::JiraConfig;
use crate::jira::error::LookupError;
use color_eyre::{eyre::eyre, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Issue identity as resolved through the Jira API.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueInfo {
  pub id: i64,
  pub summary: String,
}

/// Jira API client wrapper
#[derive(Clone)]
pub struct JiraClient {
  client: gouqi::r#async::Jira,
}

impl JiraClient {
  pub fn new(config: &JiraConfig) -> Result<Self> {
    let credentials = gouqi::Credentials::Basic(config.user.clone(), config.token.clone());

    let client = gouqi::r#async::Jira::new(&config.base_url, credentials)
      .map_err(|e| eyre!("Failed to create Jira client: {}", e))?;

    Ok(Self { client })
  }

  /// Fetch a single issue and reduce it to its numeric ID and summary.
  ///
  /// A payload without a parseable ID or a summary field counts as
  /// [`LookupError::Malformed`], which resolves like a missing issue.
  pub async fn lookup_issue(&self, key: &str) -> Result<IssueInfo, LookupError> {
    let issue = self.client.issues().get(key).await?;

    let id = issue.id.parse::<i64>().map_err(|_| {
      LookupError::Malformed(format!("issue {} has non-numeric id {:?}", key, issue.id))
    })?;

    let fields: IssueFields = reserialize(&issue.fields)
      .map_err(|e| LookupError::Malformed(format!("issue {} fields: {}", key, e)))?;

    match fields.summary {
      Some(summary) => Ok(IssueInfo { id, summary }),
      None => Err(LookupError::Malformed(format!(
        "issue {} has no summary field",
        key
      ))),
    }
  }
}

/// Re-serialize a value through JSON to convert between compatible types.
/// Useful for converting gouqi's BTreeMap fields to our typed structs.
fn reserialize<T: DeserializeOwned>(value: impl Serialize) -> serde_json::Result<T> {
  serde_json::from_value(serde_json::to_value(value)?)
}

#[derive(Debug, Deserialize)]
struct IssueFields {
  summary: Option<String>,
}
