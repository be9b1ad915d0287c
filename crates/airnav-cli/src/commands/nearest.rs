//! `nearest`: resolve a GPS fix to the closest waypoint.

use std::io;

use anyhow::{Context, Result};

use crate::output::{write_json, write_nearest_text, OutputFormat};

use super::{CommandContext, Outcome};

pub async fn handle_nearest(
    ctx: &CommandContext,
    lat: f64,
    lon: f64,
    max_distance: f64,
) -> Result<Outcome> {
    let nearest = ctx
        .service
        .find_nearest_waypoint(lat, lon, max_distance)
        .await
        .context("nearest waypoint lookup failed")?;

    let mut stdout = io::stdout().lock();
    match (nearest, ctx.format) {
        (Some(waypoint), OutputFormat::Text) => {
            write_nearest_text(&mut stdout, &waypoint, &ctx.palette)?
        }
        (Some(waypoint), OutputFormat::Json) => write_json(&mut stdout, &waypoint)?,
        (None, _) => {
            eprintln!("No waypoint within {max_distance:.0} m of ({lat}, {lon}).");
            return Ok(Outcome::NotFound);
        }
    }
    Ok(Outcome::Done)
}
