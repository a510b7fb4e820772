use std::path::PathBuf;

use dashgrid::app::App;
use dashgrid::defaults::{default_db_path, default_webview_data_dir};
use dashgrid::infra::import::csv::import_employees_csv;
use dashgrid::logging;
use tracing::{error, info, warn};

/// Optional first argument: a CSV of employees to append before the window opens.
fn import_from_args() {
    let Some(csv_path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        return;
    };
    let result = default_db_path().and_then(|db_path| import_employees_csv(&db_path, &csv_path));
    match result {
        Ok(imported) => info!(rows = imported.row_count, csv = %csv_path.display(), "imported employees"),
        Err(err) => error!(error = %format!("{err:#}"), csv = %csv_path.display(), "csv import failed"),
    }
}

fn main() {
    if let Err(err) = logging::init_default() {
        eprintln!("failed to initialize logging: {err:#}");
    }

    import_from_args();

    let mut config = dioxus::desktop::Config::new()
        .with_window(dioxus::desktop::WindowBuilder::new().with_title("dashgrid"));
    match default_webview_data_dir() {
        Ok(dir) => config = config.with_data_directory(dir),
        Err(err) => warn!(error = %format!("{err:#}"), "using the default webview data directory"),
    }

    dioxus::LaunchBuilder::desktop().with_cfg(config).launch(App);
}
