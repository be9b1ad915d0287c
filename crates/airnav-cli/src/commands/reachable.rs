//! `reachable`: waypoints within a walking distance budget.

use std::io;

use anyhow::{Context, Result};

use crate::output::{write_json, write_reachable_text, OutputFormat};

use super::{CommandContext, Outcome};

pub async fn handle_reachable(
    ctx: &CommandContext,
    from: &str,
    max_distance: f64,
) -> Result<Outcome> {
    let reachable = ctx
        .service
        .find_reachable_waypoints(from, max_distance)
        .await
        .with_context(|| format!("reachability search from {from} failed"))?;

    let mut stdout = io::stdout().lock();
    match ctx.format {
        OutputFormat::Text => {
            write_reachable_text(&mut stdout, from, max_distance, &reachable, &ctx.palette)?
        }
        OutputFormat::Json => write_json(&mut stdout, &reachable)?,
    }
    Ok(Outcome::Done)
}
