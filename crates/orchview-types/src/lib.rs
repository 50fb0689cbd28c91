//! Shared types for orchview
//!
//! This crate contains the records fetched from the orchestrator and the
//! lookup tables used to color them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use ratatui::style::Color;

mod palette;

pub use palette::{DEFAULT_COLOR, job_state_color, log_level_color};

// ============================================================================
// Orchestrator Resource Types
// ============================================================================

/// Folder (organization unit) information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Folder {
    pub id: i64,
    pub display_name: String,
    pub fully_qualified_name: Option<String>,
}

impl Folder {
    pub fn new(id: i64, display_name: String) -> Self {
        Self {
            id,
            display_name,
            fully_qualified_name: None,
        }
    }

    /// Path shown to the operator, falling back to the display name
    pub fn path(&self) -> &str {
        self.fully_qualified_name
            .as_deref()
            .unwrap_or(&self.display_name)
    }
}

/// Release (deployed process) information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Release {
    pub id: i64,
    pub name: String,
    pub process_key: String,
}

/// Job execution state
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum JobState {
    Successful,
    Faulted,
    Stopped,
    Running,
    Pending,
    Other(String),
}

impl JobState {
    /// Wire name of this state
    pub fn as_str(&self) -> &str {
        match self {
            Self::Successful => "Successful",
            Self::Faulted => "Faulted",
            Self::Stopped => "Stopped",
            Self::Running => "Running",
            Self::Pending => "Pending",
            Self::Other(s) => s,
        }
    }

    /// Get display color for this state
    pub fn color(&self) -> Color {
        job_state_color(self)
    }
}

impl From<&str> for JobState {
    fn from(s: &str) -> Self {
        match s {
            "Successful" => Self::Successful,
            "Faulted" => Self::Faulted,
            "Stopped" => Self::Stopped,
            "Running" => Self::Running,
            "Pending" => Self::Pending,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single job run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobRecord {
    pub key: String,
    pub release_name: String,
    pub state: JobState,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub process_key: Option<String>,
}

impl JobRecord {
    /// One-line summary: "release - state - start time"
    pub fn summary(&self) -> String {
        self.summary_with(&self.state)
    }

    /// Summary with the state rendered by the caller (e.g. colored)
    pub fn summary_with(&self, state: impl fmt::Display) -> String {
        format!(
            "{} - {} - {}",
            self.release_name,
            state,
            self.start_time.as_deref().unwrap_or("N/A")
        )
    }
}

// ============================================================================
// Log Types
// ============================================================================

/// Log severity level, as reported by the orchestrator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Verbose,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level `{0}`")]
pub struct ParseLevelError(pub String);

impl LogLevel {
    /// All levels, most severe first
    pub const ALL: [LogLevel; 7] = [
        Self::Fatal,
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Debug,
        Self::Trace,
        Self::Verbose,
    ];

    /// Wire name of this level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fatal => "Fatal",
            Self::Error => "Error",
            Self::Warn => "Warn",
            Self::Info => "Info",
            Self::Debug => "Debug",
            Self::Trace => "Trace",
            Self::Verbose => "Verbose",
        }
    }

    /// Short display string (3 chars)
    pub fn short(&self) -> &'static str {
        match self {
            Self::Fatal => "FTL",
            Self::Error => "ERR",
            Self::Warn => "WRN",
            Self::Info => "INF",
            Self::Debug => "DBG",
            Self::Trace => "TRC",
            Self::Verbose => "VRB",
        }
    }

    /// Get display color for this level
    pub fn color(&self) -> Color {
        log_level_color(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level filter choice; `All` disables level filtering
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LevelSelection {
    #[default]
    All,
    Only(LogLevel),
}

impl LevelSelection {
    /// Check whether a level passes this selection
    pub fn admits(&self, level: LogLevel) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == level,
        }
    }

    /// Get display label for this selection
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(level) => level.as_str(),
        }
    }

    /// Cycle to the next selection (All, Fatal, ..., Verbose, All)
    pub fn next(&self) -> Self {
        match self {
            Self::All => Self::Only(LogLevel::ALL[0]),
            Self::Only(level) => {
                let idx = LogLevel::ALL.iter().position(|l| l == level).unwrap_or(0);
                LogLevel::ALL
                    .get(idx + 1)
                    .map_or(Self::All, |next| Self::Only(*next))
            }
        }
    }

    /// Cycle to the previous selection
    pub fn prev(&self) -> Self {
        match self {
            Self::All => Self::Only(LogLevel::ALL[LogLevel::ALL.len() - 1]),
            Self::Only(level) => {
                let idx = LogLevel::ALL.iter().position(|l| l == level).unwrap_or(0);
                match idx {
                    0 => Self::All,
                    i => Self::Only(LogLevel::ALL[i - 1]),
                }
            }
        }
    }
}

impl FromStr for LevelSelection {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// A single execution log record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    /// Key of the job that produced the record
    pub job_key: String,

    /// Severity level
    pub level: LogLevel,

    /// Timestamp exactly as received
    pub timestamp: String,

    /// Message text (may span several lines)
    pub message: String,
}

impl LogRecord {
    pub fn new(
        job_key: impl Into<String>,
        level: LogLevel,
        timestamp: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            job_key: job_key.into(),
            level,
            timestamp: timestamp.into(),
            message: message.into(),
        }
    }

    /// Parse the timestamp (if it is RFC 3339)
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// Render as "[timestamp] Level - message"
    pub fn display_line(&self) -> String {
        self.display_line_with(self.level)
    }

    /// Display line with the level rendered by the caller (e.g. colored)
    pub fn display_line_with(&self, level: impl fmt::Display) -> String {
        format!("[{}] {} - {}", self.timestamp, level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_round_trips_through_wire_name() {
        for level in LogLevel::ALL {
            assert_eq!(level.as_str().parse::<LogLevel>(), Ok(level));
        }
        assert_eq!("warn".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("Notice".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_level_selection_cycle_visits_every_level() {
        let mut selection = LevelSelection::All;
        let mut seen = Vec::new();
        loop {
            selection = selection.next();
            if selection == LevelSelection::All {
                break;
            }
            seen.push(selection);
        }
        assert_eq!(seen.len(), LogLevel::ALL.len());
        assert_eq!(LevelSelection::All.prev(), LevelSelection::Only(LogLevel::Verbose));
        assert_eq!(LevelSelection::Only(LogLevel::Fatal).prev(), LevelSelection::All);
    }

    #[test]
    fn test_level_selection_parse() {
        assert_eq!("All".parse::<LevelSelection>(), Ok(LevelSelection::All));
        assert_eq!(
            "Error".parse::<LevelSelection>(),
            Ok(LevelSelection::Only(LogLevel::Error))
        );
        assert!(LevelSelection::All.admits(LogLevel::Trace));
        assert!(!LevelSelection::Only(LogLevel::Error).admits(LogLevel::Warn));
    }

    #[test]
    fn test_job_state_keeps_unknown_names() {
        assert_eq!(JobState::from("Faulted"), JobState::Faulted);
        let other = JobState::from("Suspended");
        assert_eq!(other.as_str(), "Suspended");
    }

    #[test]
    fn test_display_line_and_timestamp() {
        let record = LogRecord::new(
            "job-1",
            LogLevel::Info,
            "2025-05-16T10:20:30.123Z",
            "Process started",
        );
        assert_eq!(
            record.display_line(),
            "[2025-05-16T10:20:30.123Z] Info - Process started"
        );
        assert!(record.parsed_timestamp().is_some());

        let odd = LogRecord::new("job-1", LogLevel::Info, "yesterday", "x");
        assert!(odd.parsed_timestamp().is_none());
    }

    #[test]
    fn test_job_summary_without_start_time() {
        let job = JobRecord {
            key: "k".into(),
            release_name: "Invoices".into(),
            state: JobState::Pending,
            start_time: None,
            end_time: None,
            process_key: None,
        };
        assert_eq!(job.summary(), "Invoices - Pending - N/A");
    }
}
