//! Non-interactive commands

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand, ValueEnum};
use crossterm::style::{Stylize, style};
use ratatui::style::Color;

use orchview_api::{Folder, JobQuery, JobRecord, JobState, LogQuery, OrchestratorClient};
use orchview_logs::{ExportFormat, LevelSelection, LogRecord, Page, PageSize, encode, filter};
use orchview_tui::NO_LOGS_NOTICE;

use crate::config::Settings;
use crate::viewer;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the folders visible to the token
    Folders,

    /// List the process keys deployed to a folder
    Processes {
        /// Folder display name or id
        #[arg(long)]
        folder: String,
    },

    /// List recent jobs of a process
    Jobs {
        /// Folder display name or id
        #[arg(long)]
        folder: String,

        /// Process key
        #[arg(long)]
        process: String,

        /// Only jobs in this state
        #[arg(long, value_enum, ignore_case = true)]
        state: Option<StateFilter>,

        /// Number of jobs to list
        #[arg(long, default_value_t = orchview_api::DEFAULT_JOB_TOP)]
        top: u32,
    },

    /// Print one page of logs
    Logs {
        #[command(flatten)]
        scope: LogScope,

        /// Page to print (out-of-range pages clamp)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Records per page: 10, 25, 50 or 100
        #[arg(long, value_parser = parse_page_size)]
        page_size: Option<PageSize>,
    },

    /// Export every log matching the filters
    Export {
        #[command(flatten)]
        scope: LogScope,

        /// text, csv or xlsx
        #[arg(long)]
        format: ExportFormat,

        /// Output file (default: <job or folder>_<time>.<ext> in the export directory)
        #[arg(long, short, conflicts_with = "data_uri")]
        output: Option<PathBuf>,

        /// Print a base64 data URI instead of writing a file
        #[arg(long)]
        data_uri: bool,
    },

    /// Open the terminal log viewer
    View {
        /// Folder display name or id
        #[arg(long)]
        folder: String,

        /// Job key (opens on the job view)
        #[arg(long)]
        job: Option<String>,
    },
}

/// Which logs a command works on
#[derive(Args, Debug)]
pub struct LogScope {
    /// Folder display name or id
    #[arg(long)]
    pub folder: String,

    /// Only logs of this job
    #[arg(long)]
    pub job: Option<String>,

    /// Fatal, Error, Warn, Info, Debug, Trace, Verbose or All
    #[arg(long, default_value = "all")]
    pub level: LevelSelection,
}

/// Job states offered for filtering
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StateFilter {
    Successful,
    Faulted,
    Stopped,
    Running,
    Pending,
}

impl From<StateFilter> for JobState {
    fn from(state: StateFilter) -> Self {
        match state {
            StateFilter::Successful => JobState::Successful,
            StateFilter::Faulted => JobState::Faulted,
            StateFilter::Stopped => JobState::Stopped,
            StateFilter::Running => JobState::Running,
            StateFilter::Pending => JobState::Pending,
        }
    }
}

pub fn parse_page_size(s: &str) -> Result<PageSize, String> {
    let n: usize = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    PageSize::try_from(n).map_err(|e| e.to_string())
}

/// Run one command against the orchestrator
pub async fn execute(client: &OrchestratorClient, settings: &Settings, command: Command) -> Result<()> {
    let mut out = io::stdout().lock();
    let color = io::stdout().is_terminal();

    match command {
        Command::Folders => {
            let folders = client.folders().await.context("failed to list folders")?;
            if folders.is_empty() {
                warn_empty("No folders found.");
            }
            print_folders(&mut out, &folders)?;
        }

        Command::Processes { folder } => {
            let folder = resolve_folder(client, &folder).await?;
            let keys = client
                .process_keys(folder.id)
                .await
                .with_context(|| format!("failed to list processes of {}", folder.path()))?;
            if keys.is_empty() {
                warn_empty("No processes found in this folder.");
            }
            for key in keys {
                writeln!(out, "{key}")?;
            }
        }

        Command::Jobs {
            folder,
            process,
            state,
            top,
        } => {
            let folder = resolve_folder(client, &folder).await?;
            let query = JobQuery::for_process(process)
                .with_state(state.map(JobState::from))
                .with_top(top);
            let jobs = client
                .jobs(folder.id, &query)
                .await
                .with_context(|| format!("failed to list jobs of {}", folder.path()))?;
            if jobs.is_empty() {
                warn_empty("No jobs found for the selected filters.");
            }
            print_jobs(&mut out, &jobs, color)?;
        }

        Command::Logs {
            scope,
            page,
            page_size,
        } => {
            let records = fetch_scope(client, &scope).await?;
            if records.is_empty() {
                warn_empty(NO_LOGS_NOTICE);
            }
            let page_size = page_size.unwrap_or(settings.page_size);
            let page = orchview_logs::paginate(&records, page_size.get(), page);
            print_page(&mut out, &page, color)?;
        }

        Command::Export {
            scope,
            format,
            output,
            data_uri,
        } => {
            let records = fetch_scope(client, &scope).await?;
            if records.is_empty() {
                warn_empty(NO_LOGS_NOTICE);
                return Ok(());
            }

            let subject = scope.job.as_deref().unwrap_or(&scope.folder);
            let stem = format!("{}_{}", subject, chrono::Local::now().format("%Y%m%d_%H%M%S"));
            let export = encode(&records, format)
                .context("failed to encode export")?
                .named(&stem);

            if data_uri {
                writeln!(out, "{}", export.data_uri())?;
            } else {
                let path = match output {
                    Some(path) => {
                        fs::write(&path, &export.bytes)
                            .with_context(|| format!("failed to write {}", path.display()))?;
                        path
                    }
                    None => export.write_to_dir(&settings.export_dir).with_context(|| {
                        format!("failed to write export to {}", settings.export_dir.display())
                    })?,
                };
                writeln!(
                    out,
                    "Exported {} records as {} to {}",
                    export.records,
                    format.label(),
                    path.display()
                )?;
            }
        }

        Command::View { folder, job } => {
            let folder = resolve_folder(client, &folder).await?;
            let job_record = match &job {
                Some(key) => {
                    let found = client
                        .job(folder.id, key)
                        .await
                        .with_context(|| format!("failed to look up job {key}"))?;
                    if found.is_none() {
                        eprintln!("warning: job {key} not found in {}", folder.path());
                    }
                    found
                }
                None => None,
            };
            drop(out);
            viewer::run(client.clone(), settings, folder, job, job_record).await?;
        }
    }

    Ok(())
}

fn warn_empty(message: &str) {
    tracing::warn!("{message}");
    eprintln!("warning: {message}");
}

/// Find a folder by id, display name or fully qualified name
pub async fn resolve_folder(client: &OrchestratorClient, wanted: &str) -> Result<Folder> {
    let folders = client.folders().await.context("failed to list folders")?;
    match find_folder(&folders, wanted) {
        Some(folder) => Ok(folder.clone()),
        None => {
            let known: Vec<&str> = folders.iter().map(|f| f.display_name.as_str()).collect();
            bail!("folder `{wanted}` not found (available: {})", known.join(", "))
        }
    }
}

fn find_folder<'a>(folders: &'a [Folder], wanted: &str) -> Option<&'a Folder> {
    if let Ok(id) = wanted.parse::<i64>()
        && let Some(folder) = folders.iter().find(|f| f.id == id)
    {
        return Some(folder);
    }
    folders.iter().find(|f| {
        f.display_name.eq_ignore_ascii_case(wanted)
            || f
                .fully_qualified_name
                .as_deref()
                .is_some_and(|name| name.eq_ignore_ascii_case(wanted))
    })
}

/// Fetch the scope's logs and apply the job and level filters
async fn fetch_scope(client: &OrchestratorClient, scope: &LogScope) -> Result<Vec<LogRecord>> {
    let folder = resolve_folder(client, &scope.folder).await?;
    let query = match &scope.job {
        Some(key) => LogQuery::for_job(key.clone()),
        None => LogQuery::default(),
    };
    let records = client
        .robot_logs(folder.id, &query)
        .await
        .with_context(|| format!("failed to fetch logs of {}", folder.path()))?;
    Ok(filter(&records, scope.job.as_deref(), scope.level))
}

fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled && color != Color::Reset {
        style(text).with(color.into()).to_string()
    } else {
        text.to_string()
    }
}

fn print_folders(out: &mut impl Write, folders: &[Folder]) -> io::Result<()> {
    for folder in folders {
        writeln!(out, "{:>8}  {}", folder.id, folder.path())?;
    }
    Ok(())
}

fn print_jobs(out: &mut impl Write, jobs: &[JobRecord], color: bool) -> io::Result<()> {
    for job in jobs {
        let state = paint(job.state.as_str(), job.state.color(), color);
        writeln!(out, "{}  {}", job.key, job.summary_with(state))?;
    }
    Ok(())
}

fn print_page(out: &mut impl Write, page: &Page<'_, LogRecord>, color: bool) -> io::Result<()> {
    for record in page.items {
        let level = paint(record.level.as_str(), record.level.color(), color);
        writeln!(out, "{}", record.display_line_with(level))?;
    }
    writeln!(out, "-- {} ({} records) --", page.label(), page.total_items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchview_logs::LogLevel;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn folders() -> Vec<Folder> {
        vec![
            Folder {
                id: 3,
                display_name: "Shared".to_string(),
                fully_qualified_name: Some("Shared".to_string()),
            },
            Folder {
                id: 12,
                display_name: "Invoices".to_string(),
                fully_qualified_name: Some("Finance/Invoices".to_string()),
            },
        ]
    }

    #[test]
    fn test_find_folder_by_id_or_name() {
        let folders = folders();
        assert_eq!(find_folder(&folders, "12").map(|f| f.id), Some(12));
        assert_eq!(find_folder(&folders, "shared").map(|f| f.id), Some(3));
        assert_eq!(find_folder(&folders, "Finance/Invoices").map(|f| f.id), Some(12));
        assert!(find_folder(&folders, "99").is_none());
    }

    #[test]
    fn test_page_output_has_footer() {
        let records: Vec<_> = (0..37)
            .map(|i| LogRecord::new("j", LogLevel::Info, format!("t{i}"), format!("m{i}")))
            .collect();
        let page = orchview_logs::paginate(&records, 25, 3);
        let text = output(|out| print_page(out, &page, false));

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "[t25] Info - m25");
        assert_eq!(lines[12], "-- Page 2 of 2 (37 records) --");
    }

    #[test]
    fn test_job_lines_without_color() {
        let jobs = vec![JobRecord {
            key: "k1".to_string(),
            release_name: "Invoices_Prod".to_string(),
            state: JobState::Faulted,
            start_time: None,
            end_time: None,
            process_key: None,
        }];
        let text = output(|out| print_jobs(out, &jobs, false));
        assert_eq!(text, "k1  Invoices_Prod - Faulted - N/A\n");
    }

    #[test]
    fn test_folder_lines() {
        let text = output(|out| print_folders(out, &folders()));
        assert!(text.contains("12  Finance/Invoices"));
    }

    #[test]
    fn test_page_size_argument() {
        assert_eq!(parse_page_size("50"), Ok(PageSize::Fifty));
        assert!(parse_page_size("30").is_err());
        assert!(parse_page_size("ten").is_err());
    }
}
