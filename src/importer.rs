//! The batch import loop: parse, resolve, submit, record.

use crate::cache::{IssueCache, ISSUE_NOT_FOUND};
use crate::jira::{IssueInfo, LookupError};
use crate::tempo::{TempoClient, TempoError, WorklogCreate};
use crate::worklog::{self, LineError, WorklogFile};
use chrono::NaiveDate;
use clap::ValueEnum;
use color_eyre::Result;
use std::collections::BTreeMap;
use std::future::Future;
use tracing::{info, warn};

/// How the run outcome is judged before the report, archive and template
/// steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Gate {
  /// At least one entry logged and none failed.
  #[default]
  All,
  /// Only the final processed entry decides, regardless of earlier
  /// failures. This is the historical behavior.
  Last,
}

/// One successfully submitted entry, as echoed back by the remote service.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedWorklog {
  pub date: NaiveDate,
  pub start_time: String,
  pub issue_key: String,
  pub hours: f64,
}

#[derive(Debug)]
pub struct EntryFailure {
  pub date: NaiveDate,
  pub line: String,
  pub kind: FailureKind,
}

#[derive(Debug)]
pub enum FailureKind {
  Parse(LineError),
  UnknownIssue,
  Submission(TempoError),
}

impl std::fmt::Display for FailureKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      FailureKind::Parse(e) => write!(f, "unparseable entry: {}", e),
      FailureKind::UnknownIssue => write!(f, "issue key could not be resolved"),
      FailureKind::Submission(e) => write!(f, "submission failed: {}", e),
    }
  }
}

/// Everything one run produced, successes keyed by the worklog ID the
/// remote service assigned.
#[derive(Debug, Default)]
pub struct RunReport {
  pub logged: BTreeMap<i64, LoggedWorklog>,
  pub failures: Vec<EntryFailure>,
  /// Status of the final submission attempt, for [`Gate::Last`].
  pub last_ok: bool,
  /// Commented template of the last date section, written back to the
  /// input path after a successful run.
  pub seed: String,
}

impl RunReport {
  pub fn outcome(&self, gate: Gate) -> bool {
    match gate {
      Gate::All => !self.logged.is_empty() && self.failures.is_empty(),
      Gate::Last => self.last_ok,
    }
  }
}

/// Drives a whole run: every line of every date section, in file order,
/// sequentially. Per-entry failures are recorded and skipped; only setup
/// problems and unexpected lookup errors abort the batch.
pub struct Importer {
  tempo: TempoClient,
  cache: IssueCache,
  account_id: String,
}

impl Importer {
  pub fn new(tempo: TempoClient, cache: IssueCache, account_id: String) -> Self {
    Self {
      tempo,
      cache,
      account_id,
    }
  }

  pub async fn run<L, Fut>(&mut self, input: &WorklogFile, lookup: L) -> Result<RunReport>
  where
    L: Fn(String) -> Fut,
    Fut: Future<Output = Result<IssueInfo, LookupError>>,
  {
    let mut report = RunReport::default();

    for (date, lines) in &input.days {
      let mut section = Vec::new();

      for line in lines {
        let entry = match worklog::parse_line(line) {
          Ok(entry) => entry,
          Err(e) => {
            report.failures.push(EntryFailure {
              date: *date,
              line: line.clone(),
              kind: FailureKind::Parse(e),
            });
            report.last_ok = false;
            continue;
          }
        };

        // The template mirrors the input, not the submission outcomes.
        section.push(entry.clone());

        let issue_id = self
          .cache
          .resolve(&entry.issue_key, || lookup(entry.issue_key.clone()))
          .await?;

        let seconds = worklog::hours_to_seconds(entry.hours);
        let worklog = WorklogCreate {
          author_account_id: self.account_id.clone(),
          issue_id,
          start_date: *date,
          start_time: entry.start_time.clone(),
          time_spent_seconds: seconds,
          billable_seconds: seconds,
          description: entry.description.clone(),
        };

        match self.tempo.create_worklog(&worklog).await {
          Ok(created) => {
            let issue_key = self.cache.key_for_id(created.issue.id, &entry.issue_key);
            report.logged.insert(
              created.tempo_worklog_id,
              LoggedWorklog {
                date: created.start_date,
                start_time: created.start_time,
                issue_key,
                hours: worklog::seconds_to_hours(created.time_spent_seconds),
              },
            );
            report.last_ok = true;
          }
          Err(e) => {
            let kind = if issue_id == ISSUE_NOT_FOUND {
              FailureKind::UnknownIssue
            } else {
              FailureKind::Submission(e)
            };
            report.failures.push(EntryFailure {
              date: *date,
              line: line.clone(),
              kind,
            });
            report.last_ok = false;
          }
        }
      }

      // Later sections overwrite earlier ones, so the seed holds only the
      // most recent date in the file.
      report.seed = worklog::seed_block(*date, &section);
    }

    for failure in &report.failures {
      warn!(date = %failure.date, line = %failure.line, reason = %failure.kind, "entry was not imported");
    }
    info!(
      succeeded = report.logged.len(),
      failed = report.failures.len(),
      "import finished"
    );

    Ok(report)
  }
}
