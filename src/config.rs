//! Endpoint and credential configuration, read from the environment.
//!
//! `dotenvy` loads a local `.env` file before parsing, so both real
//! environment variables and a checked-out dotfile work.

use color_eyre::{eyre::eyre, Result};

#[derive(Debug, Clone)]
pub struct Config {
  pub jira: JiraConfig,
  pub tempo: TempoConfig,
}

#[derive(Debug, Clone)]
pub struct JiraConfig {
  pub base_url: String,
  pub user: String,
  pub token: String,
}

#[derive(Debug, Clone)]
pub struct TempoConfig {
  pub base_url: String,
  pub token: String,
  /// Account the submitted worklogs are attributed to.
  pub account_id: String,
}

impl Config {
  /// Read the full configuration from the environment.
  ///
  /// All six variables are required; a missing one aborts the run before
  /// any remote call is made.
  pub fn from_env() -> Result<Self> {
    Ok(Self {
      jira: JiraConfig {
        base_url: require("JIRA_BASE_URL")?,
        user: require("JIRA_USER")?,
        token: require("JIRA_TOKEN")?,
      },
      tempo: TempoConfig {
        base_url: require("TEMPO_BASE_URL")?,
        token: require("TEMPO_TOKEN")?,
        account_id: require("TEMPO_ACCOUNT_ID")?,
      },
    })
  }
}

fn require(name: &str) -> Result<String> {
  std::env::var(name)
    .map_err(|_| eyre!("{} is not set. Add it to the environment or an .env file.", name))
}
