//! Export of filtered log sets as Text, CSV or XLSX files

mod delimited;
mod spreadsheet;
mod text;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose::STANDARD};

use orchview_types::LogRecord;

pub use delimited::decode_csv;
pub use text::{TextEntry, decode_text};

/// Column names shared by the CSV and XLSX layouts
pub const FIELDS: [&str; 4] = ["TimeStamp", "Level", "Message", "JobKey"];

/// Errors produced while encoding or decoding an export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("xlsx: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] io::Error),

    /// An export could not be read back
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// File format of an export
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Text,
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Text => "text/plain",
            Self::Csv => "text/csv",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Csv => "CSV",
            Self::Xlsx => "Excel",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            other => Err(format!("unknown export format `{other}`")),
        }
    }
}

/// An encoded export ready to be saved or sent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Export {
    pub bytes: Vec<u8>,
    pub format: ExportFormat,
    pub file_name: String,
    /// Number of records encoded
    pub records: usize,
}

impl Export {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Rename to `<stem>.<ext>`
    pub fn named(mut self, stem: &str) -> Self {
        self.file_name = format!("{}.{}", sanitize_stem(stem), self.format.extension());
        self
    }

    /// Base64 of the payload
    pub fn base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// `data:<mime>;base64,<payload>`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), self.base64())
    }

    /// Write the payload into `dir` under its file name
    pub fn write_to_dir(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Encode every record of `records` in `format`.
///
/// Callers hand in the whole filtered set; nothing here knows about pages.
pub fn encode(records: &[LogRecord], format: ExportFormat) -> Result<Export, ExportError> {
    let bytes = match format {
        ExportFormat::Text => text::encode(records).into_bytes(),
        ExportFormat::Csv => delimited::encode(records)?,
        ExportFormat::Xlsx => spreadsheet::encode(records)?,
    };

    tracing::debug!(format = %format, records = records.len(), bytes = bytes.len(), "encoded export");

    Ok(Export {
        bytes,
        format,
        file_name: format!("logs.{}", format.extension()),
        records: records.len(),
    })
}

/// Keep file names portable
fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "logs".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchview_types::LogLevel;

    use crate::paginate::{PageSize, PageState};

    fn records(n: usize) -> Vec<LogRecord> {
        (0..n)
            .map(|i| {
                let level = LogLevel::ALL[i % LogLevel::ALL.len()];
                LogRecord::new(
                    "job-a",
                    level,
                    format!("2025-05-16T10:00:{:02}Z", i % 60),
                    format!("step {i}"),
                )
            })
            .collect()
    }

    #[test]
    fn test_formats_have_mime_and_extension() {
        assert_eq!(ExportFormat::Text.mime_type(), "text/plain");
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv");
        assert_eq!(
            ExportFormat::Xlsx.mime_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!("excel".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_is_not_truncated_by_pagination() {
        let all = records(37);
        let state = PageState::new(PageSize::Ten).next(all.len());
        assert_eq!(state.paginate(&all).items.len(), 10);

        let text = encode(&all, ExportFormat::Text).unwrap();
        assert_eq!(decode_text(std::str::from_utf8(&text.bytes).unwrap()).unwrap().len(), 37);

        let csv = encode(&all, ExportFormat::Csv).unwrap();
        assert_eq!(decode_csv(&csv.bytes).unwrap().len(), 37);

        let xlsx = encode(&all, ExportFormat::Xlsx).unwrap();
        assert_eq!(xlsx.records, 37);
    }

    #[test]
    fn test_file_names() {
        let export = encode(&records(1), ExportFormat::Csv).unwrap();
        assert_eq!(export.file_name, "logs.csv");
        let export = export.named("Invoices job/42");
        assert_eq!(export.file_name, "Invoices_job_42.csv");
        assert_eq!(export.named("").file_name, "logs.csv");
    }

    #[test]
    fn test_data_uri() {
        let export = encode(&records(1), ExportFormat::Text).unwrap();
        let uri = export.data_uri();
        assert!(uri.starts_with("data:text/plain;base64,"));

        let payload = uri.trim_start_matches("data:text/plain;base64,");
        assert_eq!(STANDARD.decode(payload).unwrap(), export.bytes);
    }

    #[test]
    fn test_empty_set_encodes_header_only() {
        let text = encode(&[], ExportFormat::Text).unwrap();
        assert!(text.bytes.is_empty());

        let csv = encode(&[], ExportFormat::Csv).unwrap();
        assert_eq!(
            String::from_utf8(csv.bytes).unwrap().trim_end(),
            "TimeStamp,Level,Message,JobKey"
        );
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();

        let export = encode(&records(3), ExportFormat::Csv).unwrap().named("job-a");
        let path = export.write_to_dir(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "job-a.csv");
        assert_eq!(std::fs::read(&path).unwrap(), export.bytes);
    }
}
