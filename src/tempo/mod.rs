//! Worklog submission against the Tempo REST API.

mod client;
mod error;
mod types;

pub use client::TempoClient;
pub use error::TempoError;
pub use types::{CreatedWorklog, WorklogCreate};
