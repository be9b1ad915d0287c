//! Output formatting for command results.
//!
//! Every renderer writes to a generic [`Write`] so tests can capture output.
//! `text` is meant for people, `json` for scripts.

use std::collections::HashMap;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use airnav_lib::{ConnectionType, GraphStats, ReachableWaypoint, Route, Waypoint};

use crate::terminal::{arrow, format_with_separators, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Write `value` as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    out.write_all(b"\n")
}

fn describe(waypoint: &Waypoint) -> String {
    format!(
        "{} [{}] {} floor {}",
        waypoint.id, waypoint.kind, waypoint.terminal_id, waypoint.floor_number
    )
}

fn transfer_color(kind: &ConnectionType, palette: &ColorPalette) -> &'static str {
    match kind {
        ConnectionType::Walk | ConnectionType::MovingWalkway => palette.green,
        _ => palette.yellow,
    }
}

/// Render a route as a tagged list of waypoints with per-hop distances.
pub fn write_route_text<W: Write>(
    out: &mut W,
    route: &Route,
    palette: &ColorPalette,
) -> io::Result<()> {
    let details: HashMap<&str, &Waypoint> = route
        .waypoints
        .iter()
        .map(|waypoint| (waypoint.id.as_str(), waypoint))
        .collect();
    let label = |id: &str| -> String {
        details
            .get(id)
            .map(|waypoint| waypoint.display_name().to_string())
            .unwrap_or_else(|| id.to_string())
    };

    let start = route.path.first().map(String::as_str).unwrap_or_default();
    let goal = route.path.last().map(String::as_str).unwrap_or_default();
    writeln!(
        out,
        "Route {} {} {} ({} hops; algorithm: {}):",
        label(start),
        arrow(),
        label(goal),
        route.hop_count(),
        route.algorithm
    )?;

    let last = route.path.len().saturating_sub(1);
    for (index, id) in route.path.iter().enumerate() {
        let (tag, color) = if index == 0 {
            ("STRT", palette.tag_start)
        } else if index == last {
            ("GOAL", palette.tag_goal)
        } else {
            (" .. ", palette.tag_step)
        };

        let info = details
            .get(id.as_str())
            .map(|waypoint| describe(waypoint))
            .unwrap_or_else(|| id.clone());
        writeln!(
            out,
            " {color}{tag}{reset} {bold}{name}{reset} {gray}({info}){reset}",
            reset = palette.reset,
            bold = palette.white_bold,
            gray = palette.gray,
            name = label(id),
        )?;

        let next = route.path.get(index + 1);
        let segment = route
            .segments
            .iter()
            .find(|segment| &segment.from == id && Some(&segment.to) == next);
        if let Some(segment) = segment {
            writeln!(
                out,
                "   {gray}|{reset} {color}{distance:.0} m{reset} via {kind} {gray}({time:.0} s){reset}",
                gray = palette.gray,
                reset = palette.reset,
                color = transfer_color(&segment.connection_type, palette),
                distance = segment.distance_meters,
                kind = segment.connection_type,
                time = segment.time_seconds,
            )?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "Total distance: {} m",
        format_with_separators(route.total_distance)
    )?;
    writeln!(out, "Estimated walking time: {} min", route.total_time)
}

/// Render reachable waypoints, nearest first.
pub fn write_reachable_text<W: Write>(
    out: &mut W,
    start: &str,
    max_distance: f64,
    reachable: &[ReachableWaypoint],
    palette: &ColorPalette,
) -> io::Result<()> {
    writeln!(
        out,
        "{} waypoint(s) reachable from {} within {:.0} m:",
        reachable.len(),
        start,
        max_distance
    )?;
    for entry in reachable {
        writeln!(
            out,
            " {green}{distance:>8.1} m{reset}  {bold}{name}{reset} {gray}({info}){reset}",
            green = palette.green,
            reset = palette.reset,
            bold = palette.white_bold,
            gray = palette.gray,
            distance = entry.distance,
            name = entry.waypoint.display_name(),
            info = describe(&entry.waypoint),
        )?;
    }
    Ok(())
}

/// Render the waypoint nearest to a GPS fix.
pub fn write_nearest_text<W: Write>(
    out: &mut W,
    waypoint: &Waypoint,
    palette: &ColorPalette,
) -> io::Result<()> {
    writeln!(
        out,
        "Nearest waypoint: {bold}{name}{reset} {gray}({info}){reset}",
        bold = palette.white_bold,
        reset = palette.reset,
        gray = palette.gray,
        name = waypoint.display_name(),
        info = describe(waypoint),
    )?;
    if let Some((lat, lon)) = waypoint.gps_position() {
        writeln!(out, "GPS: {lat:.6}, {lon:.6}")?;
    }
    Ok(())
}

pub fn write_stats_text<W: Write>(out: &mut W, stats: &GraphStats) -> io::Result<()> {
    writeln!(out, "Waypoints:      {}", format_with_separators(stats.nodes as u64))?;
    writeln!(out, "Connections:    {}", format_with_separators(stats.edges as u64))?;
    writeln!(out, "Average degree: {:.2}", stats.avg_degree)?;
    writeln!(out, "Max degree:     {}", stats.max_degree)?;
    writeln!(out, "Min degree:     {}", stats.min_degree)?;
    writeln!(out, "Cached:         {}", if stats.cached { "yes" } else { "no" })
}
