//! Terminal log viewer loop

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc;

use orchview_api::{Folder, JobRecord, LogQuery, OrchestratorClient};
use orchview_logs::{ExportFormat, LogRecord, encode};
use orchview_tui::{
    Action, AppState, Event, EventHandler, KeyBindings, KeyContext, LogView, LogViewerScreen,
    Tui,
};

use crate::config::Settings;

/// Tick rate of the event reader (drives notice expiry)
const TICK_RATE: Duration = Duration::from_millis(250);

/// Internal actions for async operations
enum InternalAction {
    LoadJobLogs,
    LoadFolderBatch,
    JobLogsLoaded(Vec<LogRecord>),
    FolderBatchLoaded(Vec<LogRecord>),
    Error(LogView, String),
}

pub async fn run(
    client: OrchestratorClient,
    settings: &Settings,
    folder: Folder,
    job_key: Option<String>,
    job: Option<JobRecord>,
) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (internal_tx, mut internal_rx) = mpsc::unbounded_channel::<InternalAction>();

    let mut state = AppState::new(folder, job_key, settings.page_size, settings.load_more_step)
        .with_job(job);

    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(TICK_RATE);
    let keybindings = KeyBindings::new();

    let _ = internal_tx.send(load_action(state.current_view));

    render(&mut tui, &mut state)?;

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => {
                        let action = if state.ui_state.search_active {
                            keybindings.get_filter_input_action(&key)
                        } else {
                            keybindings.get_action(KeyContext::LogViewer, &key)
                        };
                        if let Some(action) = action {
                            let _ = action_tx.send(action);
                        }
                    }
                    Event::Tick => {
                        let _ = action_tx.send(Action::Tick);
                    }
                    Event::Resize(_, _) => {
                        let _ = action_tx.send(Action::Render);
                    }
                    Event::Error(e) => {
                        state.show_error(e);
                    }
                }
            }

            Some(action) = action_rx.recv() => {
                handle_action(&mut state, &internal_tx, &settings.export_dir, action);
            }

            Some(internal) = internal_rx.recv() => {
                match internal {
                    InternalAction::LoadJobLogs => {
                        let Some(key) = state.job_key.clone() else {
                            continue;
                        };
                        state.ui_state.loading = true;
                        render(&mut tui, &mut state)?;

                        let result = client.robot_logs(state.folder.id, &LogQuery::for_job(key)).await;
                        state.ui_state.loading = false;
                        let _ = internal_tx.send(match result {
                            Ok(records) => InternalAction::JobLogsLoaded(records),
                            Err(e) => InternalAction::Error(
                                LogView::Job,
                                format!("Failed to load job logs: {}", e),
                            ),
                        });
                    }

                    InternalAction::LoadFolderBatch => {
                        let Some((skip, top)) = state.next_folder_window() else {
                            state.show_info("All folder logs are loaded");
                            continue;
                        };
                        state.ui_state.loading = true;
                        render(&mut tui, &mut state)?;

                        let result = client.robot_logs(state.folder.id, &LogQuery::window(skip, top)).await;
                        state.ui_state.loading = false;
                        let _ = internal_tx.send(match result {
                            Ok(records) => InternalAction::FolderBatchLoaded(records),
                            Err(e) => InternalAction::Error(
                                LogView::Folder,
                                format!("Failed to load folder logs: {}", e),
                            ),
                        });
                    }

                    InternalAction::JobLogsLoaded(records) => {
                        tracing::debug!(count = records.len(), "job logs loaded");
                        state.set_job_records(records);
                    }

                    InternalAction::FolderBatchLoaded(records) => {
                        tracing::debug!(count = records.len(), "folder batch loaded");
                        state.append_folder_batch(records);
                    }

                    InternalAction::Error(view, msg) => {
                        tracing::warn!("{msg}");
                        state.fail_view(view, msg);
                    }
                }
            }
        }

        if state.should_quit {
            break;
        }

        render(&mut tui, &mut state)?;
    }

    events.shutdown();
    tui.restore()?;

    Ok(())
}

fn load_action(view: LogView) -> InternalAction {
    match view {
        LogView::Job => InternalAction::LoadJobLogs,
        LogView::Folder => InternalAction::LoadFolderBatch,
    }
}

fn handle_action(
    state: &mut AppState,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    export_dir: &Path,
    action: Action,
) {
    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::GoBack => {
            state.go_back();
        }
        Action::ToggleHelp => {
            state.ui_state.help_visible = !state.ui_state.help_visible;
        }
        Action::ToggleStats => {
            state.ui_state.stats_visible = !state.ui_state.stats_visible;
        }

        Action::NextPage => state.next_page(),
        Action::PreviousPage => state.previous_page(),
        Action::CyclePageSize => state.cycle_page_size(),
        Action::ScrollUp(n) => state.scroll_up(n),
        Action::ScrollDown(n) => state.scroll_down(n),
        Action::ScrollToTop => state.scroll_to_top(),
        Action::ScrollToBottom => state.scroll_to_bottom(),
        Action::LoadMore => {
            if state.current_view == LogView::Folder {
                let _ = internal_tx.send(InternalAction::LoadFolderBatch);
            } else {
                state.show_info("Load more applies to the folder view ([Tab] to switch)");
            }
        }

        Action::CycleLevel => state.cycle_level(true),
        Action::CycleLevelBack => state.cycle_level(false),
        Action::SwitchView => {
            if state.switch_view() {
                let _ = internal_tx.send(load_action(state.current_view));
            }
        }

        Action::OpenSearch => state.start_search(),
        Action::CloseSearch => state.cancel_search(),
        Action::SearchInput(c) => state.search_input_char(c),
        Action::SearchBackspace => state.search_input_backspace(),
        Action::SearchClear => state.search_input_clear(),
        Action::ApplyFilter => state.apply_filter(),
        Action::ClearFilter => state.clear_filter(),
        Action::ToggleCaseSensitive => state.toggle_case_sensitive(),

        Action::Refresh => {
            state.reset_view(state.current_view);
            let _ = internal_tx.send(load_action(state.current_view));
        }

        Action::Export(format) => export_view(state, export_dir, format),

        Action::Tick => {
            state.expire_notice(Instant::now());
        }
        Action::Render => {}
    }
}

/// Export the whole filtered set of the current view into `export_dir`
fn export_view(state: &mut AppState, export_dir: &Path, format: ExportFormat) {
    let records = state.filtered_records();
    if records.is_empty() {
        state.show_info("Nothing to export for the selected filters");
        return;
    }

    let stem = state.export_stem(chrono::Local::now());
    let result = encode(&records, format)
        .map_err(|e| e.to_string())
        .and_then(|export| {
            export
                .named(&stem)
                .write_to_dir(export_dir)
                .map_err(|e| e.to_string())
        });

    match result {
        Ok(path) => {
            tracing::info!(path = %path.display(), count = records.len(), "exported logs");
            state.show_info(format!(
                "Exported {} logs as {} to {}",
                records.len(),
                format.label(),
                path.display()
            ));
        }
        Err(e) => {
            state.show_error(format!("Export failed: {}", e));
        }
    }
}

fn render(tui: &mut Tui, state: &mut AppState) -> Result<()> {
    tui.terminal().draw(|frame| {
        LogViewerScreen::render(frame, state);
    })?;
    Ok(())
}
