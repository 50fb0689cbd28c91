//! Log processing for orchview
//!
//! This crate provides filtering, pagination, per-level counts and
//! Text/CSV/XLSX export of fetched log records.

mod counts;
pub mod export;
mod filter;
mod paginate;

pub use counts::LevelCounts;
pub use export::{Export, ExportError, ExportFormat, encode};
pub use filter::{LogFilter, filter};
pub use paginate::{
    InvalidPageSize, LoadMoreState, Page, PageSize, PageState, paginate, total_pages,
};

// Re-export types used in our public API
pub use orchview_types::{LevelSelection, LogLevel, LogRecord};
