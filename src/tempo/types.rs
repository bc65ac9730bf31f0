//! Serde types matching the Tempo worklog endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body of `POST /worklogs`. Billable seconds always equal the time spent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorklogCreate {
  pub author_account_id: String,
  pub issue_id: i64,
  pub start_date: NaiveDate,
  pub start_time: String,
  pub time_spent_seconds: i64,
  pub billable_seconds: i64,
  pub description: String,
}

/// The slice of the creation response the importer reports on.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedWorklog {
  pub tempo_worklog_id: i64,
  pub start_date: NaiveDate,
  pub start_time: String,
  pub time_spent_seconds: i64,
  pub issue: WorklogIssue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorklogIssue {
  pub id: i64,
}
