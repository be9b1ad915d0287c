//! `init-db`: create the waypoint schema.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use airnav_lib::SqliteWaypointRepository;

use super::Outcome;

pub fn handle_init_db(db_path: &Path) -> Result<Outcome> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let repository = SqliteWaypointRepository::open(db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    repository
        .init_schema()
        .context("failed to create waypoint schema")?;

    info!(path = %db_path.display(), "waypoint schema ready");
    println!("Waypoint database ready at {}", db_path.display());
    Ok(Outcome::Done)
}
