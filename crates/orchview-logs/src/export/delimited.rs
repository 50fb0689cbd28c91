use orchview_types::{LogLevel, LogRecord};

use super::{ExportError, FIELDS};

/// Header row plus one row per record
pub(super) fn encode(records: &[LogRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(FIELDS)?;

    for r in records {
        writer.write_record([
            r.timestamp.as_str(),
            r.level.as_str(),
            r.message.as_str(),
            r.job_key.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

/// Read a CSV export back into records
pub fn decode_csv(bytes: &[u8]) -> Result<Vec<LogRecord>, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let column = |name: &str| -> Result<usize, ExportError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ExportError::Parse {
                line: 1,
                reason: format!("missing column `{name}`"),
            })
    };
    let ts_col = column("TimeStamp")?;
    let level_col = column("Level")?;
    let message_col = column("Message")?;
    let job_col = column("JobKey")?;

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row?;
        // Header is line 1
        let line = idx + 2;
        let field = |col: usize| row.get(col).unwrap_or_default().to_string();

        let level = field(level_col)
            .parse::<LogLevel>()
            .map_err(|e| ExportError::Parse {
                line,
                reason: e.to_string(),
            })?;

        records.push(LogRecord {
            job_key: field(job_col),
            level,
            timestamp: field(ts_col),
            message: field(message_col),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_escaping() {
        let records = vec![LogRecord::new(
            "j1",
            LogLevel::Warn,
            "2025-05-16T10:00:00Z",
            "Value \"A\", then B",
        )];
        let text = String::from_utf8(encode(&records).unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("TimeStamp,Level,Message,JobKey"));
        assert_eq!(
            lines.next(),
            Some("2025-05-16T10:00:00Z,Warn,\"Value \"\"A\"\", then B\",j1")
        );
    }

    #[test]
    fn test_round_trip_keeps_every_field() {
        let records = vec![
            LogRecord::new("j1", LogLevel::Info, "2025-05-16T10:00:00Z", "plain"),
            LogRecord::new(
                "j2",
                LogLevel::Error,
                "2025-05-16T10:00:01Z",
                "line one\nline two, with comma",
            ),
            LogRecord::new("j1", LogLevel::Verbose, "2025-05-16T10:00:02Z", ""),
        ];
        let decoded = decode_csv(&encode(&records).unwrap()).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn test_decode_reports_missing_column() {
        let err = decode_csv(b"TimeStamp,Level,Message\nt,Info,m\n").unwrap_err();
        assert!(err.to_string().contains("JobKey"));
    }
}
