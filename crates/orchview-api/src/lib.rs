//! Orchestrator client for orchview
//!
//! This crate issues authenticated, read-only OData requests for folders,
//! releases, jobs and robot logs, and turns the entities into typed records.

mod client;
mod error;
mod query;
mod records;

pub use client::{
    ClientConfig, DEFAULT_TIMEOUT, OrchestratorClient, SCOPE_HEADER, distinct_process_keys,
};
pub use error::{ApiError, Result};
pub use query::{DEFAULT_JOB_TOP, JobQuery, LogQuery, quote};
pub use records::{FromEntity, parse_all, parse_entity};

// Re-export types used in our public API
pub use orchview_types::{Folder, JobRecord, JobState, LogLevel, LogRecord, Release};
