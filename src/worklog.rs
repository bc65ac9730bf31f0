//! Worklog input file handling.
//!
//! The input is a YAML mapping of date to a list of entry lines. Section
//! order is preserved so the template written back after a run reflects
//! the most recent date in the file, not the most recent by calendar.

use chrono::{DateTime, Local, NaiveDate};
use color_eyre::{eyre::eyre, Result};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Parsed worklog input, one entry per date section in file order.
#[derive(Debug, Clone, Default)]
pub struct WorklogFile {
  pub days: Vec<(NaiveDate, Vec<String>)>,
}

impl WorklogFile {
  /// Load and parse a worklog file.
  pub fn load(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read worklog file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("{}: {}", path.display(), e))
  }

  /// Parse worklog YAML. An empty or comments-only document yields zero
  /// date sections, which lets a freshly written template be re-run as is.
  pub fn parse(contents: &str) -> Result<Self> {
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }

    let mapping: Option<serde_yaml::Mapping> =
      serde_yaml::from_str(contents).map_err(|e| eyre!("Invalid worklog YAML: {}", e))?;

    let mut days = Vec::new();
    for (key, value) in mapping.unwrap_or_default() {
      let date_str = key
        .as_str()
        .ok_or_else(|| eyre!("Worklog date key is not a string: {:?}", key))?;
      let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| eyre!("Invalid worklog date {:?}: {}", date_str, e))?;
      let lines: Vec<String> = serde_yaml::from_value(value)
        .map_err(|e| eyre!("Invalid entry list under {}: {}", date_str, e))?;
      days.push((date, lines));
    }

    Ok(Self { days })
  }
}

/// One worklog entry line, split into its fields.
///
/// The raw hours token is kept alongside the parsed value so the template
/// can reproduce the line as the user wrote it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
  pub hours: f64,
  pub hours_raw: String,
  pub start_time: String,
  pub issue_key: String,
  pub description: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum LineError {
  #[error("expected at least 3 tokens (hours, start time, issue key), found {found}")]
  TooFewTokens { found: usize },
  #[error("invalid hours value {token:?}")]
  InvalidHours { token: String },
}

/// Split an entry line into hours, start time, issue key and description.
///
/// Tokens are whitespace-separated; everything after the third token is the
/// description, re-joined with single spaces. The start time is passed
/// through verbatim.
pub fn parse_line(line: &str) -> Result<ParsedLine, LineError> {
  let tokens: Vec<&str> = line.split_whitespace().collect();
  if tokens.len() < 3 {
    return Err(LineError::TooFewTokens {
      found: tokens.len(),
    });
  }

  let hours: f64 = tokens[0].parse().map_err(|_| LineError::InvalidHours {
    token: tokens[0].to_string(),
  })?;
  if !hours.is_finite() {
    return Err(LineError::InvalidHours {
      token: tokens[0].to_string(),
    });
  }

  Ok(ParsedLine {
    hours,
    hours_raw: tokens[0].to_string(),
    start_time: tokens[1].to_string(),
    issue_key: tokens[2].to_string(),
    description: tokens[3..].join(" "),
  })
}

/// Convert hours to whole seconds, truncating toward zero.
pub fn hours_to_seconds(hours: f64) -> i64 {
  (hours * 3600.0) as i64
}

pub fn seconds_to_hours(seconds: i64) -> f64 {
  seconds as f64 / 3600.0
}

/// Render a date section as a commented template block.
///
/// Every line is prefixed with `#` so the block parses as an empty document
/// until the user uncomments and edits it for the next run.
pub fn seed_block(date: NaiveDate, lines: &[ParsedLine]) -> String {
  let mut block = format!("#{}:\n", date.format("%Y-%m-%d"));
  for line in lines {
    block.push_str(&format!(
      "#- {} {} {} {}\n",
      line.hours_raw, line.start_time, line.issue_key, line.description
    ));
  }
  block
}

/// Archive file name for a given local timestamp.
pub fn archive_destination(dir: &Path, when: &DateTime<Local>) -> PathBuf {
  dir.join(format!("worklog_{}.yml", when.format("%Y%m%d%H%M%S")))
}

/// Move the imported file into the archive directory, creating the
/// directory if needed. The rename itself is fatal on failure.
pub fn archive_worklog_file(src: &Path, dir: &Path) -> Result<PathBuf> {
  std::fs::create_dir_all(dir)
    .map_err(|e| eyre!("Failed to create archive directory {}: {}", dir.display(), e))?;

  let dest = archive_destination(dir, &Local::now());
  std::fs::rename(src, &dest)
    .map_err(|e| eyre!("Failed to archive {} to {}: {}", src.display(), dest.display(), e))?;

  Ok(dest)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn test_parse_line_joins_description() {
    let line = parse_line("2.5 10:00 PROJ-1 code review and pairing").unwrap();

    assert_eq!(line.hours, 2.5);
    assert_eq!(line.hours_raw, "2.5");
    assert_eq!(line.start_time, "10:00");
    assert_eq!(line.issue_key, "PROJ-1");
    assert_eq!(line.description, "code review and pairing");
  }

  #[test]
  fn test_parse_line_three_tokens_has_empty_description() {
    let line = parse_line("8 09:00 PROJ-2").unwrap();

    assert_eq!(line.hours, 8.0);
    assert_eq!(line.description, "");
  }

  #[test]
  fn test_parse_line_collapses_extra_whitespace() {
    let line = parse_line("  1 09:00  PROJ-3   fix   the   thing ").unwrap();

    assert_eq!(line.issue_key, "PROJ-3");
    assert_eq!(line.description, "fix the thing");
  }

  #[test]
  fn test_parse_line_too_few_tokens() {
    assert_eq!(
      parse_line("2.5 10:00"),
      Err(LineError::TooFewTokens { found: 2 })
    );
    assert_eq!(parse_line(""), Err(LineError::TooFewTokens { found: 0 }));
  }

  #[test]
  fn test_parse_line_rejects_bad_hours() {
    assert_eq!(
      parse_line("abc 10:00 PROJ-1"),
      Err(LineError::InvalidHours {
        token: "abc".to_string()
      })
    );
    assert_eq!(
      parse_line("NaN 10:00 PROJ-1"),
      Err(LineError::InvalidHours {
        token: "NaN".to_string()
      })
    );
  }

  #[test]
  fn test_hours_to_seconds_truncates() {
    assert_eq!(hours_to_seconds(2.5), 9000);
    assert_eq!(hours_to_seconds(8.0), 28800);
    // 0.333 h = 1198.8 s, truncated rather than rounded
    assert_eq!(hours_to_seconds(0.333), 1198);
  }

  #[test]
  fn test_seconds_to_hours() {
    assert_eq!(seconds_to_hours(9000), 2.5);
    assert_eq!(seconds_to_hours(28800), 8.0);
  }

  #[test]
  fn test_parse_preserves_file_order() {
    let input = "\
2024-03-12:
- 8 09:00 PROJ-2
2024-03-11:
- 2.5 10:00 PROJ-1 code review
";
    let file = WorklogFile::parse(input).unwrap();

    assert_eq!(file.days.len(), 2);
    assert_eq!(
      file.days[0].0,
      NaiveDate::from_ymd_opt(2024, 3, 12).unwrap()
    );
    assert_eq!(
      file.days[1].0,
      NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
    );
    assert_eq!(file.days[1].1, vec!["2.5 10:00 PROJ-1 code review"]);
  }

  #[test]
  fn test_parse_empty_and_comments_only() {
    assert!(WorklogFile::parse("").unwrap().days.is_empty());
    assert!(WorklogFile::parse("   \n").unwrap().days.is_empty());

    let template = "#2024-03-11:\n#- 2.5 10:00 PROJ-1 code review\n";
    assert!(WorklogFile::parse(template).unwrap().days.is_empty());
  }

  #[test]
  fn test_parse_rejects_date_with_no_entries() {
    assert!(WorklogFile::parse("2024-03-11:\n").is_err());
  }

  #[test]
  fn test_parse_rejects_invalid_date() {
    assert!(WorklogFile::parse("not-a-date:\n- 1 09:00 PROJ-1\n").is_err());
  }

  #[test]
  fn test_seed_block_format() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
    let lines = vec![
      parse_line("2.5 10:00 PROJ-1 code review").unwrap(),
      parse_line("8 09:00 PROJ-2").unwrap(),
    ];

    let block = seed_block(date, &lines);

    assert_eq!(
      block,
      "#2024-03-11:\n#- 2.5 10:00 PROJ-1 code review\n#- 8 09:00 PROJ-2 \n"
    );
  }

  #[test]
  fn test_seed_block_reparses_as_empty() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
    let lines = vec![parse_line("2.5 10:00 PROJ-1 code review").unwrap()];

    let block = seed_block(date, &lines);

    assert!(WorklogFile::parse(&block).unwrap().days.is_empty());
  }

  #[test]
  fn test_archive_destination_name() {
    let when = Local.with_ymd_and_hms(2024, 3, 11, 17, 30, 5).unwrap();
    let dest = archive_destination(Path::new("archive"), &when);

    assert_eq!(dest, PathBuf::from("archive/worklog_20240311173005.yml"));
  }

  #[test]
  fn test_archive_moves_file_into_new_directory() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("worklog.yml");
    std::fs::write(&src, "2024-03-11:\n- 2.5 10:00 PROJ-1\n").unwrap();
    let archive_dir = dir.path().join("archive");

    let dest = archive_worklog_file(&src, &archive_dir).unwrap();

    assert!(!src.exists());
    assert!(dest.exists());
    let name = dest.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("worklog_") && name.ends_with(".yml"));
    assert_eq!(
      std::fs::read_to_string(dest).unwrap(),
      "2024-03-11:\n- 2.5 10:00 PROJ-1\n"
    );
  }
}
