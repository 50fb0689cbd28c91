use orchview_logs::ExportFormat;

/// All possible actions in the log viewer (command pattern)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Close the topmost overlay or notice
    GoBack,

    // UI toggles
    ToggleHelp,
    ToggleStats,

    // Pagination
    NextPage,
    PreviousPage,
    CyclePageSize,
    /// Fetch the next batch of the folder view
    LoadMore,

    // Scrolling within the current page
    ScrollUp(usize),
    ScrollDown(usize),
    ScrollToTop,
    ScrollToBottom,

    // Filtering
    CycleLevel,
    CycleLevelBack,
    SwitchView,

    // Search bar
    OpenSearch,
    CloseSearch,
    SearchInput(char),
    SearchBackspace,
    SearchClear,
    ApplyFilter,
    ClearFilter,
    ToggleCaseSensitive,

    /// Re-fetch the current view from the first record
    Refresh,

    Export(ExportFormat),

    // Tick (for notice expiry)
    Tick,

    // Render request
    Render,
}
