//! Persistent issue cache mapping issue keys to numeric issue IDs.
//!
//! The store is a YAML-compatible text file of `KEY: ID # summary` lines.
//! Entries are only ever appended, never updated or removed. There is no
//! file locking; concurrent invocations against the same cache file are
//! unsupported.

use crate::jira::{IssueInfo, LookupError};
use color_eyre::{eyre::eyre, Result};
use std::collections::HashMap;
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Sentinel issue ID for keys that could not be resolved.
pub const ISSUE_NOT_FOUND: i64 = -1;

#[derive(Debug)]
pub struct IssueCache {
  path: PathBuf,
  keys: HashMap<String, i64>,
  ids: HashMap<i64, String>,
}

impl IssueCache {
  /// Load the full cache from disk. A missing or malformed store is fatal;
  /// an empty or comments-only file is an empty cache.
  pub fn load(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read issue cache {}: {}", path.display(), e))?;

    let keys: HashMap<String, i64> = if contents.trim().is_empty() {
      HashMap::new()
    } else {
      serde_yaml::from_str::<Option<HashMap<String, i64>>>(&contents)
        .map_err(|e| eyre!("Failed to parse issue cache {}: {}", path.display(), e))?
        .unwrap_or_default()
    };

    let ids = keys.iter().map(|(key, id)| (*id, key.clone())).collect();

    Ok(Self {
      path: path.to_path_buf(),
      keys,
      ids,
    })
  }

  pub fn len(&self) -> usize {
    self.keys.len()
  }

  /// Resolve an issue key to its numeric ID.
  ///
  /// Cache hits return immediately. On a miss the supplied fetch runs once;
  /// a successful lookup is appended to the store and both in-memory maps.
  /// An expected lookup miss resolves to [`ISSUE_NOT_FOUND`] without
  /// touching the cache, so the key is retried on the next encounter.
  /// Unexpected lookup errors propagate and abort the run.
  pub async fn resolve<F, Fut>(&mut self, key: &str, fetch: F) -> Result<i64>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<IssueInfo, LookupError>>,
  {
    if let Some(id) = self.keys.get(key) {
      return Ok(*id);
    }

    match fetch().await {
      Ok(info) => {
        self.append(key, &info)?;
        self.keys.insert(key.to_string(), info.id);
        self.ids.insert(info.id, key.to_string());
        info!(key, id = info.id, "issue cached");
        Ok(info.id)
      }
      Err(e) if e.is_resolution_miss() => {
        warn!(key, error = %e, "could not find issue key");
        Ok(ISSUE_NOT_FOUND)
      }
      Err(e) => {
        error!(key, error = %e, "issue lookup failed");
        Err(eyre!("Failed to look up issue {}: {}", key, e))
      }
    }
  }

  /// Map a numeric ID back to its key, falling back to the given key for
  /// IDs the cache has never seen. The fallback is remembered in memory
  /// only, matching the append-on-successful-lookup persistence rule.
  pub fn key_for_id(&mut self, id: i64, fallback: &str) -> String {
    self
      .ids
      .entry(id)
      .or_insert_with(|| fallback.to_string())
      .clone()
  }

  fn append(&self, key: &str, info: &IssueInfo) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
      .append(true)
      .open(&self.path)
      .map_err(|e| eyre!("Failed to open issue cache {}: {}", self.path.display(), e))?;

    // The leading newline keeps a hand-edited file without a trailing
    // newline from gluing two entries onto one line.
    write!(file, "\n{}: {} # {}", key, info.id, info.summary)
      .map_err(|e| eyre!("Failed to append to issue cache {}: {}", self.path.display(), e))?;

    Ok(())
  }
}
