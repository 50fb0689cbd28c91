use orchview_types::{LogLevel, LogRecord};

/// Counts per log level
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub fatal: usize,
    pub error: usize,
    pub warn: usize,
    pub info: usize,
    pub debug: usize,
    pub trace: usize,
    pub verbose: usize,
}

impl LevelCounts {
    /// Count the records of a set per level
    pub fn tally(records: &[LogRecord]) -> Self {
        let mut counts = Self::default();

        for record in records {
            match record.level {
                LogLevel::Fatal => counts.fatal += 1,
                LogLevel::Error => counts.error += 1,
                LogLevel::Warn => counts.warn += 1,
                LogLevel::Info => counts.info += 1,
                LogLevel::Debug => counts.debug += 1,
                LogLevel::Trace => counts.trace += 1,
                LogLevel::Verbose => counts.verbose += 1,
            }
        }

        counts
    }

    /// Count for one level
    pub fn get(&self, level: LogLevel) -> usize {
        match level {
            LogLevel::Fatal => self.fatal,
            LogLevel::Error => self.error,
            LogLevel::Warn => self.warn,
            LogLevel::Info => self.info,
            LogLevel::Debug => self.debug,
            LogLevel::Trace => self.trace,
            LogLevel::Verbose => self.verbose,
        }
    }

    pub fn total(&self) -> usize {
        self.fatal + self.error + self.warn + self.info + self.debug + self.trace + self.verbose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally() {
        let records: Vec<_> = [LogLevel::Info, LogLevel::Error, LogLevel::Info]
            .into_iter()
            .map(|level| LogRecord::new("j", level, "t", "m"))
            .collect();
        let counts = LevelCounts::tally(&records);
        assert_eq!(counts.get(LogLevel::Info), 2);
        assert_eq!(counts.error, 1);
        assert_eq!(counts.total(), 3);
    }
}
