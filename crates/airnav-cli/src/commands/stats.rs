//! `stats`: waypoint graph size and degree summary.

use std::io;

use anyhow::{Context, Result};

use crate::output::{write_json, write_stats_text, OutputFormat};

use super::{CommandContext, Outcome};

pub async fn handle_stats(ctx: &CommandContext) -> Result<Outcome> {
    let stats = ctx
        .service
        .graph_stats()
        .await
        .context("failed to build waypoint graph")?;

    let mut stdout = io::stdout().lock();
    match ctx.format {
        OutputFormat::Text => write_stats_text(&mut stdout, &stats)?,
        OutputFormat::Json => write_json(&mut stdout, &stats)?,
    }
    Ok(Outcome::Done)
}
