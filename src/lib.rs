mod bookmarks;
mod browser;
mod catalog;
mod errors;
mod geo;
mod models;
mod search;
mod storage;

pub use bookmarks::BookmarkStore;
pub use browser::BrowserCore;
pub use catalog::{DatasetSource, FetchFuture, FileSource, JobCatalog, StaticSource};
pub use errors::{AppError, AppResult};
pub use models::{
    BrowsePhase, BrowserSnapshot, Coordinates, FilterState, JobRecord, MapMarker, SearchScope,
};
pub use search::filter_jobs;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

// Called once by the embedding shell before constructing the stores.
pub fn init_tracing(data_dir: &Path) -> Result<(), String> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "jobdeck.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}
