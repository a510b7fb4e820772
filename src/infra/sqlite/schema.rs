use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// The grid and the CSV importer may hold the file at the same time.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .context("failed to set sqlite busy timeout")?;
    Ok(conn)
}

/// Creates the employee table and its search indexes if they are missing.
pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS employee (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL,
            department  TEXT NOT NULL,
            role        TEXT NOT NULL,
            status      TEXT NOT NULL DEFAULT 'active',
            join_date   TEXT NOT NULL,
            salary      REAL NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_employee_name
            ON employee(name);

        CREATE INDEX IF NOT EXISTS idx_employee_department
            ON employee(department);
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
