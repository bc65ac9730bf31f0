mod cache;
mod config;
mod importer;
mod jira;
mod tempo;
mod worklog;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tempo-pump")]
#[command(about = "Batch-imports a YAML worklog file into Tempo")]
#[command(version)]
struct Args {
  /// Path to the worklog file to import
  #[arg(short, long)]
  worklogs: PathBuf,

  /// Path to the persistent issue cache
  #[arg(long, default_value = ".issues.yml")]
  cache: PathBuf,

  /// Directory the imported worklog file is moved into
  #[arg(long, default_value = "archive")]
  archive_dir: PathBuf,

  /// Directory the log file is written to
  #[arg(long, default_value = "logs")]
  log_dir: PathBuf,

  /// How the run outcome is judged before archiving
  #[arg(long, value_enum, default_value = "all")]
  gate: importer::Gate,

  /// Skip rewriting the input with a commented template of the last day
  #[arg(long)]
  no_template: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;
  dotenvy::dotenv().ok();

  let args = Args::parse();

  // Keep the guard alive so buffered log lines are flushed on exit
  let _guard = init_logging(&args.log_dir)?;

  let config = config::Config::from_env()?;

  let cache = cache::IssueCache::load(&args.cache)?;
  info!(entries = cache.len(), "issue cache loaded");

  let input = worklog::WorklogFile::load(&args.worklogs)?;

  let jira = jira::JiraClient::new(&config.jira)?;
  let tempo = tempo::TempoClient::new(&config.tempo)?;

  let mut importer = importer::Importer::new(tempo, cache, config.tempo.account_id.clone());
  let report = importer
    .run(&input, |key| {
      let jira = jira.clone();
      async move { jira.lookup_issue(&key).await }
    })
    .await?;

  // A failed gate leaves the input in place for a corrected re-run; the
  // details are in the log file.
  if report.outcome(args.gate) {
    print_report(&report);

    let archived = worklog::archive_worklog_file(&args.worklogs, &args.archive_dir)?;
    info!(to = %archived.display(), "worklog file archived");

    if !args.no_template {
      std::fs::write(&args.worklogs, &report.seed)
        .map_err(|e| eyre!("Failed to write template {}: {}", args.worklogs.display(), e))?;
    }
  }

  Ok(())
}

fn print_report(report: &importer::RunReport) {
  if report.logged.is_empty() {
    return;
  }

  println!("These worklogs were logged:");
  for logged in report.logged.values() {
    println!(
      "{} {} {} {}",
      logged.date, logged.start_time, logged.issue_key, logged.hours
    );
  }
}

fn init_logging(dir: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
  std::fs::create_dir_all(dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let file = tracing_appender::rolling::never(dir, "tempo-pump.log");
  let (writer, guard) = tracing_appender::non_blocking(file);

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}
