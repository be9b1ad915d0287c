//! Handlers for the CLI subcommands.
//!
//! `main.rs` parses arguments and dispatches here; each handler writes its
//! result to stdout in the selected [`OutputFormat`].

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use airnav_lib::{PathfindingConfig, PathfindingService, SqliteWaypointRepository};

use crate::output::OutputFormat;
use crate::terminal::ColorPalette;

pub mod init_db;
pub mod nearest;
pub mod reachable;
pub mod route;
pub mod stats;

/// How a successful command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The query was valid but matched nothing (no route, no nearby waypoint).
    NotFound,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Done => ExitCode::SUCCESS,
            Outcome::NotFound => ExitCode::from(2),
        }
    }
}

/// Shared state for query commands.
pub struct CommandContext {
    pub service: PathfindingService,
    pub format: OutputFormat,
    pub palette: ColorPalette,
}

impl CommandContext {
    /// Open the waypoint database at `db_path` and build a service over it.
    ///
    /// The database must already exist; `init-db` creates it.
    pub fn open(db_path: &Path, format: OutputFormat) -> Result<Self> {
        if !db_path.exists() {
            bail!(
                "waypoint database not found at {}; run `airnav-cli init-db` first",
                db_path.display()
            );
        }

        let repository = SqliteWaypointRepository::open(db_path)
            .with_context(|| format!("failed to open database {}", db_path.display()))?;
        let config = PathfindingConfig::from_env().context("invalid pathfinding configuration")?;

        Ok(Self {
            service: PathfindingService::with_config(Arc::new(repository), config),
            format,
            palette: ColorPalette::detect(),
        })
    }
}
