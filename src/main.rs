mod cli;
mod config;
mod viewer;

use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use orchview_api::OrchestratorClient;

use crate::cli::Command;
use crate::config::{FileConfig, Overrides, Settings};

/// orchview - browse and export orchestrator job logs from the terminal
#[derive(Parser, Debug)]
#[command(name = "orchview")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// OData root of the orchestrator
    #[arg(long, global = true, env = "ORCHVIEW_BASE_URL")]
    base_url: Option<String>,

    /// Bearer token
    #[arg(long, global = true, env = "ORCHVIEW_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Config file (default: <config dir>/orchview/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory exports are written to
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            page_size: None,
            export_dir: self.export_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.command);

    let result = run(args).await;

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

/// Where tracing output goes
#[derive(Debug, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    /// The viewer owns the terminal, so logs go to a file
    File,
}

impl LogTarget {
    fn for_command(command: &Command) -> Self {
        match command {
            Command::View { .. } => Self::File,
            _ => Self::Stderr,
        }
    }
}

fn init_tracing(command: &Command) {
    let builder = tracing_subscriber::fmt().with_env_filter(
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::WARN.into()),
    );

    if LogTarget::for_command(command) == LogTarget::Stderr {
        builder.with_writer(std::io::stderr).init();
        return;
    }

    match open_log_file() {
        Some(file) => builder
            .with_ansi(false)
            .with_writer(Arc::new(file))
            .init(),
        None => builder.with_writer(std::io::sink).init(),
    }
}

/// `<cache dir>/orchview/orchview.log`, opened for appending
fn open_log_file() -> Option<File> {
    let dir = dirs::cache_dir()?.join("orchview");
    fs::create_dir_all(&dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("orchview.log"))
        .ok()
}

async fn run(args: Args) -> Result<()> {
    let file = FileConfig::load(args.config.as_deref())?;
    let settings = Settings::resolve(file, args.overrides())?;
    let client = OrchestratorClient::new(settings.client_config())
        .context("failed to create HTTP client")?;

    cli::execute(&client, &settings, args.command).await
}
