//! `route`: shortest route between two waypoints, or from a GPS fix.

use std::io;

use anyhow::{Context, Result};

use airnav_lib::RouteOptions;

use crate::output::{write_json, write_route_text, OutputFormat};

use super::{CommandContext, Outcome};

/// Where the route starts.
#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    Waypoint(String),
    Position { lat: f64, lon: f64 },
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Waypoint(id) => f.write_str(id),
            Origin::Position { lat, lon } => write!(f, "({lat}, {lon})"),
        }
    }
}

pub async fn handle_route(
    ctx: &CommandContext,
    origin: &Origin,
    to: &str,
    options: RouteOptions,
) -> Result<Outcome> {
    let route = match origin {
        Origin::Waypoint(from) => ctx.service.find_route(from, to, options).await,
        Origin::Position { lat, lon } => {
            ctx.service
                .find_route_from_position(*lat, *lon, to, options)
                .await
        }
    }
    .with_context(|| format!("route search from {origin} to {to} failed"))?;

    let Some(route) = route else {
        eprintln!("{}", no_route_message(origin, to, options));
        return Ok(Outcome::NotFound);
    };

    let mut stdout = io::stdout().lock();
    match ctx.format {
        OutputFormat::Text => write_route_text(&mut stdout, &route, &ctx.palette)?,
        OutputFormat::Json => write_json(&mut stdout, &route)?,
    }
    Ok(Outcome::Done)
}

fn no_route_message(origin: &Origin, to: &str, options: RouteOptions) -> String {
    let mut message = format!("No route found from {origin} to {to}.");
    let mut tips = Vec::new();
    if options.avoid_stairs {
        tips.push("allow stairs (omit --avoid-stairs)");
    }
    if options.accessible_only {
        tips.push("allow inaccessible connections (omit --accessible-only)");
    }
    if !tips.is_empty() {
        message.push(' ');
        message.push_str(&format!("Try to {}.", tips.join(", ")));
    }
    message
}
