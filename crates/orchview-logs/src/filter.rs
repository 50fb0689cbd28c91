use regex::Regex;

use orchview_types::{LevelSelection, LogRecord};

/// Narrow records to one job and/or one level, keeping their order.
///
/// `job_key = None` keeps every job; `LevelSelection::All` keeps every level.
pub fn filter(
    records: &[LogRecord],
    job_key: Option<&str>,
    level: LevelSelection,
) -> Vec<LogRecord> {
    records
        .iter()
        .filter(|r| job_key.is_none_or(|key| r.job_key == key))
        .filter(|r| level.admits(r.level))
        .cloned()
        .collect()
}

/// Compiled filter for log records
#[derive(Clone, Default)]
pub struct LogFilter {
    /// Job to keep (None = all jobs)
    job_key: Option<String>,

    /// Level to keep
    level: LevelSelection,

    /// Message pattern (if any)
    regex: Option<Regex>,

    /// Original pattern string
    pattern: String,
}

impl LogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one job
    pub fn with_job(mut self, job_key: Option<String>) -> Self {
        self.job_key = job_key;
        self
    }

    /// Restrict to one level
    pub fn with_level(mut self, level: LevelSelection) -> Self {
        self.level = level;
        self
    }

    /// Restrict to messages matching a pattern
    pub fn with_pattern(mut self, pattern: &str, case_insensitive: bool) -> Result<Self, regex::Error> {
        if pattern.is_empty() {
            self.regex = None;
        } else if case_insensitive {
            // Prepend (?i) for case insensitive matching
            self.regex = Some(Regex::new(&format!("(?i){}", pattern))?);
        } else {
            self.regex = Some(Regex::new(pattern)?);
        }
        self.pattern = pattern.to_string();
        Ok(self)
    }

    /// Check if a record matches this filter
    pub fn matches(&self, record: &LogRecord) -> bool {
        if let Some(key) = &self.job_key
            && &record.job_key != key
        {
            return false;
        }

        if !self.level.admits(record.level) {
            return false;
        }

        match &self.regex {
            Some(re) => re.is_match(&record.message),
            None => true,
        }
    }

    /// Matching records, in their original order
    pub fn apply(&self, records: &[LogRecord]) -> Vec<LogRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }

    /// Find all match positions in a string (for highlighting)
    pub fn find_matches(&self, text: &str) -> Vec<(usize, usize)> {
        match &self.regex {
            Some(re) => re.find_iter(text).map(|m| (m.start(), m.end())).collect(),
            None => Vec::new(),
        }
    }

    /// Get the original pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check if filter is empty (matches everything)
    pub fn is_empty(&self) -> bool {
        self.job_key.is_none() && self.level == LevelSelection::All && self.regex.is_none()
    }
}

impl std::fmt::Debug for LogFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogFilter")
            .field("job_key", &self.job_key)
            .field("level", &self.level)
            .field("pattern", &self.pattern)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchview_types::LogLevel;

    fn record(job: &str, level: LogLevel, message: &str) -> LogRecord {
        LogRecord::new(job, level, "2025-05-16T10:00:00Z", message)
    }

    fn ten_with_three_errors() -> Vec<LogRecord> {
        let levels = [
            LogLevel::Info,
            LogLevel::Error,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Trace,
            LogLevel::Info,
            LogLevel::Error,
            LogLevel::Verbose,
        ];
        levels
            .iter()
            .enumerate()
            .map(|(i, level)| record("job-a", *level, &format!("message {i}")))
            .collect()
    }

    #[test]
    fn test_level_filter_keeps_order() {
        let records = ten_with_three_errors();
        let errors = filter(&records, None, LevelSelection::Only(LogLevel::Error));

        let messages: Vec<_> = errors.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["message 1", "message 4", "message 8"]);
    }

    #[test]
    fn test_every_level_selects_exact_subsequence() {
        let records = ten_with_three_errors();
        for level in LogLevel::ALL {
            let expected: Vec<_> = records.iter().filter(|r| r.level == level).cloned().collect();
            assert_eq!(filter(&records, None, LevelSelection::Only(level)), expected);
        }
    }

    #[test]
    fn test_all_and_no_job_keep_everything() {
        let records = ten_with_three_errors();
        assert_eq!(filter(&records, None, LevelSelection::All), records);
    }

    #[test]
    fn test_job_scoping() {
        let records = vec![
            record("job-a", LogLevel::Info, "a1"),
            record("job-b", LogLevel::Info, "b1"),
            record("job-a", LogLevel::Error, "a2"),
        ];
        let only_a = filter(&records, Some("job-a"), LevelSelection::All);
        assert_eq!(only_a.len(), 2);
        assert!(only_a.iter().all(|r| r.job_key == "job-a"));

        let a_errors = filter(&records, Some("job-a"), LevelSelection::Only(LogLevel::Error));
        assert_eq!(a_errors.len(), 1);
        assert_eq!(a_errors[0].message, "a2");
    }

    #[test]
    fn test_log_filter_pattern() {
        let filter = LogFilter::new().with_pattern("selector", true).unwrap();
        assert!(filter.matches(&record("j", LogLevel::Error, "Selector not found")));
        assert!(!filter.matches(&record("j", LogLevel::Error, "Queue item added")));

        let strict = LogFilter::new().with_pattern("selector", false).unwrap();
        assert!(!strict.matches(&record("j", LogLevel::Error, "Selector not found")));
    }

    #[test]
    fn test_log_filter_combines_conditions() {
        let filter = LogFilter::new()
            .with_job(Some("job-a".into()))
            .with_level(LevelSelection::Only(LogLevel::Error))
            .with_pattern("timeout", true)
            .unwrap();
        assert!(filter.matches(&record("job-a", LogLevel::Error, "Timeout reached")));
        assert!(!filter.matches(&record("job-b", LogLevel::Error, "Timeout reached")));
        assert!(!filter.matches(&record("job-a", LogLevel::Warn, "Timeout reached")));
        assert!(!filter.is_empty());
        assert!(LogFilter::new().is_empty());
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(LogFilter::new().with_pattern("(unclosed", true).is_err());
    }

    #[test]
    fn test_find_matches() {
        let filter = LogFilter::new().with_pattern("error", false).unwrap();
        let matches = filter.find_matches("an error occurred, another error here");
        assert_eq!(matches.len(), 2);
    }
}
