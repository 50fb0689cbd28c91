use std::time::{Duration, Instant};

use chrono::{DateTime, TimeZone};

use orchview_logs::{LevelCounts, LoadMoreState, LogFilter, PageSize, PageState};
use orchview_types::{Folder, JobRecord, LevelSelection, LogRecord};

/// Shown when the current filters leave nothing to display
pub const NO_LOGS_NOTICE: &str = "No logs found for the selected filters.";

/// How long informational notices stay up
const INFO_NOTICE_TTL: Duration = Duration::from_secs(5);

/// Which record set the viewer is showing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogView {
    /// Logs of the selected job, page-indexed
    Job,
    /// Logs of the whole folder, fetched in load-more batches
    Folder,
}

impl LogView {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Job => "Job",
            Self::Folder => "Folder",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// One-line message shown above the status bar
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    expires_at: Option<Instant>,
}

impl Notice {
    /// Informational notice, expires on its own
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
            expires_at: Some(Instant::now() + INFO_NOTICE_TTL),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
            expires_at: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
            expires_at: None,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Records and page position of one view
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    /// Records as fetched, before client-side filtering
    pub records: Vec<LogRecord>,

    /// Current page and page size
    pub page: PageState,

    /// Has this view been fetched since the last reset?
    pub loaded: bool,

    /// First visible line of the current page, clamped when rendered
    pub scroll: usize,
}

impl ViewState {
    fn new(page_size: PageSize) -> Self {
        Self {
            records: Vec::new(),
            page: PageState::new(page_size),
            loaded: false,
            scroll: 0,
        }
    }

    /// Move to another page, starting at its top
    fn set_page(&mut self, page: PageState) {
        self.page = page;
        self.scroll = 0;
    }

    fn clear(&mut self) {
        self.records.clear();
        self.set_page(self.page.reset());
        self.loaded = false;
    }
}

/// UI-specific transient state
pub struct UiState {
    /// Is search/filter bar active?
    pub search_active: bool,

    /// Current search input text
    pub search_input: String,

    /// Is help overlay visible?
    pub help_visible: bool,

    /// Show level counts bar?
    pub stats_visible: bool,

    /// Message pattern in force (None = no pattern)
    pub active_filter: Option<LogFilter>,

    /// Filter input error message (e.g., invalid regex)
    pub filter_error: Option<String>,

    /// Case insensitive search?
    pub filter_case_insensitive: bool,

    /// Selected level, shared by both views
    pub level: LevelSelection,

    /// Notice to display (if any)
    pub notice: Option<Notice>,

    /// A fetch is in flight
    pub loading: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            search_active: false,
            search_input: String::new(),
            help_visible: false,
            stats_visible: false,
            active_filter: None,
            filter_error: None,
            filter_case_insensitive: true,
            level: LevelSelection::All,
            notice: None,
            loading: false,
        }
    }
}

/// Global application state
pub struct AppState {
    /// Folder every request is scoped to
    pub folder: Folder,

    /// Key of the job whose logs the job view shows
    pub job_key: Option<String>,

    /// Job details, when the lookup found it
    pub job: Option<JobRecord>,

    /// View being displayed
    pub current_view: LogView,

    pub job_view: ViewState,

    pub folder_view: ViewState,

    /// Batches fetched into the folder view
    pub folder_window: LoadMoreState,

    /// UI state
    pub ui_state: UiState,

    /// Whether app should quit
    pub should_quit: bool,
}

impl AppState {
    /// Open on the job view when a job is given, the folder view otherwise
    pub fn new(
        folder: Folder,
        job_key: Option<String>,
        page_size: PageSize,
        load_more_step: usize,
    ) -> Self {
        let current_view = if job_key.is_some() {
            LogView::Job
        } else {
            LogView::Folder
        };

        Self {
            folder,
            job_key,
            job: None,
            current_view,
            job_view: ViewState::new(page_size),
            folder_view: ViewState::new(page_size),
            folder_window: LoadMoreState::new(load_more_step),
            ui_state: UiState::default(),
            should_quit: false,
        }
    }

    /// Attach the looked-up job details
    pub fn with_job(mut self, job: Option<JobRecord>) -> Self {
        self.job = job;
        self
    }

    pub fn view(&self) -> &ViewState {
        self.view_of(self.current_view)
    }

    pub fn view_of(&self, view: LogView) -> &ViewState {
        match view {
            LogView::Job => &self.job_view,
            LogView::Folder => &self.folder_view,
        }
    }

    fn view_mut(&mut self, view: LogView) -> &mut ViewState {
        match view {
            LogView::Job => &mut self.job_view,
            LogView::Folder => &mut self.folder_view,
        }
    }

    /// Filter for the current view: job scope, level and message pattern
    pub fn log_filter(&self) -> LogFilter {
        let job_key = match self.current_view {
            LogView::Job => self.job_key.clone(),
            LogView::Folder => None,
        };
        self.ui_state
            .active_filter
            .clone()
            .unwrap_or_default()
            .with_job(job_key)
            .with_level(self.ui_state.level)
    }

    /// Whole filtered set of the current view (what exports receive)
    pub fn filtered_records(&self) -> Vec<LogRecord> {
        self.log_filter().apply(&self.view().records)
    }

    /// Per-level counts of the current view, ignoring the level selection
    pub fn level_counts(&self) -> LevelCounts {
        let records = self
            .log_filter()
            .with_level(LevelSelection::All)
            .apply(&self.view().records);
        LevelCounts::tally(&records)
    }

    /// Advance one page
    pub fn next_page(&mut self) {
        let total = self.filtered_records().len();
        let view = self.view_mut(self.current_view);
        view.set_page(view.page.next(total));
    }

    /// Go back one page
    pub fn previous_page(&mut self) {
        let total = self.filtered_records().len();
        let view = self.view_mut(self.current_view);
        view.set_page(view.page.clamp(total).previous());
    }

    /// Switch to the next page size and return to page 1
    pub fn cycle_page_size(&mut self) {
        let view = self.view_mut(self.current_view);
        view.set_page(view.page.with_page_size(view.page.page_size.next()));
    }

    /// Scroll the current page up by `n` lines
    pub fn scroll_up(&mut self, n: usize) {
        let view = self.view_mut(self.current_view);
        view.scroll = view.scroll.saturating_sub(n);
    }

    /// Scroll the current page down by `n` lines; rendering clamps to the last line
    pub fn scroll_down(&mut self, n: usize) {
        let view = self.view_mut(self.current_view);
        view.scroll = view.scroll.saturating_add(n);
    }

    pub fn scroll_to_top(&mut self) {
        self.view_mut(self.current_view).scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.view_mut(self.current_view).scroll = usize::MAX;
    }

    /// Clamp the current view's scroll so the last page line stays at the bottom
    pub fn clamp_scroll(&mut self, total_lines: usize, visible_lines: usize) -> usize {
        let max_scroll = total_lines.saturating_sub(visible_lines);
        let view = self.view_mut(self.current_view);
        view.scroll = view.scroll.min(max_scroll);
        view.scroll
    }

    /// Cycle the level selection and return both views to page 1
    pub fn cycle_level(&mut self, forward: bool) {
        self.ui_state.level = if forward {
            self.ui_state.level.next()
        } else {
            self.ui_state.level.prev()
        };
        self.reset_pages();
        self.refresh_empty_notice();
    }

    /// Toggle between the job and folder views.
    ///
    /// Returns true when the newly shown view still has to be fetched.
    pub fn switch_view(&mut self) -> bool {
        if self.job_key.is_none() {
            self.ui_state.notice = Some(Notice::warning(
                "No job selected; start the viewer with --job to use the job view",
            ));
            return false;
        }

        self.current_view = match self.current_view {
            LogView::Job => LogView::Folder,
            LogView::Folder => LogView::Job,
        };
        self.refresh_empty_notice();
        !self.view().loaded
    }

    /// Replace the job view's records
    pub fn set_job_records(&mut self, records: Vec<LogRecord>) {
        self.job_view.records = records;
        self.job_view.set_page(self.job_view.page.reset());
        self.job_view.loaded = true;
        self.refresh_empty_notice();
    }

    /// `(skip, top)` of the next folder batch, None once everything is loaded
    pub fn next_folder_window(&self) -> Option<(usize, usize)> {
        self.folder_window.next_window()
    }

    /// Append a fetched batch to the folder view
    pub fn append_folder_batch(&mut self, records: Vec<LogRecord>) {
        let first_batch = !self.folder_view.loaded;
        self.folder_window = self.folder_window.record_batch(records.len());
        self.folder_view.records.extend(records);
        self.folder_view.loaded = true;

        if self.folder_window.exhausted && !first_batch {
            self.ui_state.notice = Some(Notice::info(format!(
                "All {} folder logs loaded",
                self.folder_window.loaded
            )));
        }
        self.refresh_empty_notice();
    }

    /// Forget a view's records so the next fetch starts over
    pub fn reset_view(&mut self, view: LogView) {
        self.view_mut(view).clear();
        if view == LogView::Folder {
            self.folder_window = self.folder_window.reset();
        }
    }

    /// A fetch for `view` failed: drop its data and show the error
    pub fn fail_view(&mut self, view: LogView, msg: String) {
        self.reset_view(view);
        self.show_error(msg);
    }

    fn reset_pages(&mut self) {
        self.job_view.set_page(self.job_view.page.reset());
        self.folder_view.set_page(self.folder_view.page.reset());
    }

    /// Show or retire the "no logs" notice for the current view
    fn refresh_empty_notice(&mut self) {
        let empty = self.view().loaded && self.filtered_records().is_empty();
        let showing = self
            .ui_state
            .notice
            .as_ref()
            .is_some_and(|n| n.text == NO_LOGS_NOTICE);

        if empty && !showing {
            self.ui_state.notice = Some(Notice::info(NO_LOGS_NOTICE));
        } else if !empty && showing {
            self.ui_state.notice = None;
        }
    }

    /// Show an informational notice
    pub fn show_info(&mut self, msg: impl Into<String>) {
        self.ui_state.notice = Some(Notice::info(msg));
    }

    /// Show an error message
    pub fn show_error(&mut self, msg: String) {
        self.ui_state.notice = Some(Notice::error(msg));
    }

    /// Dismiss the notice
    pub fn dismiss_notice(&mut self) {
        self.ui_state.notice = None;
    }

    /// Drop the notice once its time is up
    pub fn expire_notice(&mut self, now: Instant) -> bool {
        if self.ui_state.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.ui_state.notice = None;
            return true;
        }
        false
    }

    /// Close the help overlay, else the notice
    pub fn go_back(&mut self) {
        if self.ui_state.help_visible {
            self.ui_state.help_visible = false;
        } else {
            self.dismiss_notice();
        }
    }

    /// Start search/filter input mode
    pub fn start_search(&mut self) {
        self.ui_state.search_active = true;
        self.ui_state.search_input = self
            .ui_state
            .active_filter
            .as_ref()
            .map(|f| f.pattern().to_string())
            .unwrap_or_default();
        self.ui_state.filter_error = None;
    }

    /// Leave search input, keeping whatever filter is active
    pub fn cancel_search(&mut self) {
        self.ui_state.search_active = false;
        self.ui_state.search_input.clear();
        self.ui_state.filter_error = None;
    }

    /// Apply the current search input as a filter
    pub fn apply_filter(&mut self) {
        self.ui_state.filter_error = None;

        if self.ui_state.search_input.is_empty() {
            self.ui_state.search_active = false;
            self.clear_filter();
            return;
        }

        match LogFilter::new().with_pattern(
            &self.ui_state.search_input,
            self.ui_state.filter_case_insensitive,
        ) {
            Ok(filter) => {
                self.ui_state.search_active = false;
                self.ui_state.active_filter = Some(filter);
                self.reset_pages();
                self.refresh_empty_notice();
            }
            Err(e) => {
                self.ui_state.filter_error = Some(format!("Invalid regex: {}", e));
                // Keep input open to fix
                self.ui_state.search_active = true;
            }
        }
    }

    /// Clear the active filter
    pub fn clear_filter(&mut self) {
        self.ui_state.active_filter = None;
        self.ui_state.search_input.clear();
        self.ui_state.filter_error = None;
        self.reset_pages();
        self.refresh_empty_notice();
    }

    /// Flip case sensitivity and recompile the active pattern
    pub fn toggle_case_sensitive(&mut self) {
        self.ui_state.filter_case_insensitive = !self.ui_state.filter_case_insensitive;
        let Some(active) = self.ui_state.active_filter.take() else {
            return;
        };
        let pattern = active.pattern().to_string();
        self.ui_state.active_filter = Some(
            LogFilter::new()
                .with_pattern(&pattern, self.ui_state.filter_case_insensitive)
                .unwrap_or(active),
        );
        self.refresh_empty_notice();
    }

    /// Add a character to search input
    pub fn search_input_char(&mut self, c: char) {
        self.ui_state.search_input.push(c);
    }

    /// Remove last character from search input
    pub fn search_input_backspace(&mut self) {
        self.ui_state.search_input.pop();
    }

    /// Empty the search input
    pub fn search_input_clear(&mut self) {
        self.ui_state.search_input.clear();
    }

    /// File stem for an export taken at `now`: job key or folder name plus time
    pub fn export_stem<Tz: TimeZone>(&self, now: DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let subject = match self.current_view {
            LogView::Job => self.job_key.as_deref().unwrap_or("job"),
            LogView::Folder => self.folder.display_name.as_str(),
        };
        format!("{}_{}", subject, now.format("%Y%m%d_%H%M%S"))
    }
}
