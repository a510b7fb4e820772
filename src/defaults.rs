use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 20, 50];
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_SEARCH_PLACEHOLDER: &str = "Search...";
pub const DEFAULT_CREATE_LABEL: &str = "Create";

/// Synthetic column key appended when a grid has row actions.
pub const ACTIONS_COLUMN: &str = "actions";

pub const DEFAULT_LOG_FILTER: &str = "info,dashgrid=debug";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "dashgrid", "dashgrid")
        .ok_or_else(|| anyhow!("failed to resolve application data directory"))
}

pub fn default_db_path() -> Result<PathBuf> {
    let dirs = project_dirs()?;
    Ok(dirs.data_dir().join("dashgrid.sqlite"))
}

pub fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_dir = base_data_dir.join("webview");
    std::fs::create_dir_all(&webview_dir)
        .with_context(|| format!("failed to create webview dir: {}", webview_dir.display()))?;
    Ok(webview_dir)
}

pub fn default_webview_data_dir() -> Result<PathBuf> {
    let dirs = project_dirs()?;
    ensure_webview_data_dir(dirs.data_local_dir())
}
