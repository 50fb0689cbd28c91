use orchview_types::{LogLevel, LogRecord};

use super::ExportError;

/// Continuation lines of a multi-line message start with this
const CONTINUATION: char = '\t';

/// One record read back from a text export
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

impl From<&LogRecord> for TextEntry {
    fn from(record: &LogRecord) -> Self {
        Self {
            timestamp: record.timestamp.clone(),
            level: record.level,
            message: record.message.clone(),
        }
    }
}

/// `[timestamp] Level - message` per record, newline separated
pub(super) fn encode(records: &[LogRecord]) -> String {
    records
        .iter()
        .map(|r| {
            let message = r.message.replace('\n', "\n\t");
            format!("[{}] {} - {}", r.timestamp, r.level, message)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read a text export back into entries
pub fn decode_text(input: &str) -> Result<Vec<TextEntry>, ExportError> {
    let mut entries: Vec<TextEntry> = Vec::new();
    if input.is_empty() {
        return Ok(entries);
    }

    for (idx, line) in input.split('\n').enumerate() {
        let line_no = idx + 1;

        if let Some(rest) = line.strip_prefix(CONTINUATION) {
            let Some(last) = entries.last_mut() else {
                return Err(parse_error(line_no, "continuation before first record"));
            };
            last.message.push('\n');
            last.message.push_str(rest);
            continue;
        }

        let body = line
            .strip_prefix('[')
            .ok_or_else(|| parse_error(line_no, "record does not start with `[`"))?;
        let (timestamp, rest) = body
            .split_once("] ")
            .ok_or_else(|| parse_error(line_no, "unterminated timestamp"))?;
        let (level, message) = rest
            .split_once(" - ")
            .ok_or_else(|| parse_error(line_no, "missing ` - ` separator"))?;
        let level = level
            .parse::<LogLevel>()
            .map_err(|e| parse_error(line_no, &e.to_string()))?;

        entries.push(TextEntry {
            timestamp: timestamp.to_string(),
            level,
            message: message.to_string(),
        });
    }

    Ok(entries)
}

fn parse_error(line: usize, reason: &str) -> ExportError {
    ExportError::Parse {
        line,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<LogRecord> {
        vec![
            LogRecord::new("j1", LogLevel::Info, "2025-05-16T10:00:00Z", "Process started"),
            LogRecord::new(
                "j1",
                LogLevel::Error,
                "2025-05-16T10:00:05Z",
                "Selector not found - retrying [attempt 2]",
            ),
            LogRecord::new("j1", LogLevel::Debug, "2025-05-16T10:00:06Z", ""),
        ]
    }

    #[test]
    fn test_line_format() {
        let text = encode(&sample()[..1]);
        assert_eq!(text, "[2025-05-16T10:00:00Z] Info - Process started");
    }

    #[test]
    fn test_one_line_per_record() {
        let text = encode(&sample());
        assert_eq!(text.lines().count(), 3);
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_round_trip() {
        let records = sample();
        let decoded = decode_text(&encode(&records)).unwrap();
        let expected: Vec<TextEntry> = records.iter().map(TextEntry::from).collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_multiline_messages_round_trip() {
        let records = vec![
            LogRecord::new(
                "j1",
                LogLevel::Fatal,
                "2025-05-16T10:00:00Z",
                "Unhandled exception\r\n   at Main.xaml\n\tindented\n",
            ),
            LogRecord::new("j1", LogLevel::Info, "2025-05-16T10:00:01Z", "after"),
        ];
        let text = encode(&records);
        let starts = text.split('\n').filter(|l| l.starts_with('[')).count();
        assert_eq!(starts, 2);

        let decoded = decode_text(&text).unwrap();
        assert_eq!(decoded[0].message, records[0].message);
        assert_eq!(decoded[1].message, "after");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_text("not a log line"),
            Err(ExportError::Parse { line: 1, .. })
        ));
        assert!(decode_text("[t] Loud - x").is_err());
        assert!(decode_text("\torphan").is_err());
        assert!(decode_text("").unwrap().is_empty());
    }
}
