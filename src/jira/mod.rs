//! Issue lookups against the Jira REST API.

mod client;
mod error;

pub use client::{IssueInfo, JiraClient};
pub use error::LookupError;
