use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};

use airnav_cli::commands::init_db::handle_init_db;
use airnav_cli::commands::nearest::handle_nearest;
use airnav_cli::commands::reachable::handle_reachable;
use airnav_cli::commands::route::{handle_route, Origin};
use airnav_cli::commands::stats::handle_stats;
use airnav_cli::commands::{CommandContext, Outcome};
use airnav_cli::logging::{init_logging, LoggingConfig};
use airnav_cli::output::OutputFormat;
use airnav_lib::{default_database_path, RouteOptions, DEFAULT_SNAP_DISTANCE_M};

#[derive(Parser, Debug)]
#[command(author, version, about = "Airport waypoint routing utilities")]
struct Cli {
    /// Path to the waypoint database (defaults to the platform data directory).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the shortest route to a waypoint.
    Route(RouteArgs),
    /// List waypoints within walking distance of a start waypoint.
    Reachable {
        /// Start waypoint id.
        #[arg(long)]
        from: String,
        /// Maximum walking distance in meters.
        #[arg(long)]
        max_distance: f64,
    },
    /// Find the waypoint closest to a GPS position.
    Nearest {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Search radius in meters.
        #[arg(long, default_value_t = DEFAULT_SNAP_DISTANCE_M)]
        max_distance: f64,
    },
    /// Print waypoint graph statistics.
    Stats,
    /// Create the waypoint schema in the database.
    InitDb,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("origin").required(true).args(["from", "lat"])))]
struct RouteArgs {
    /// Start waypoint id.
    #[arg(long)]
    from: Option<String>,
    /// Start latitude; the nearest waypoint is used as the origin.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Start longitude.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,
    /// Destination waypoint id.
    #[arg(long)]
    to: String,
    /// Skip stair connections.
    #[arg(long)]
    avoid_stairs: bool,
    /// Only use wheelchair-accessible connections.
    #[arg(long)]
    accessible_only: bool,
}

impl RouteArgs {
    fn origin(&self) -> Option<Origin> {
        match (&self.from, self.lat, self.lon) {
            (Some(from), _, _) => Some(Origin::Waypoint(from.clone())),
            (None, Some(lat), Some(lon)) => Some(Origin::Position { lat, lon }),
            _ => None,
        }
    }

    fn options(&self) -> RouteOptions {
        RouteOptions {
            avoid_stairs: self.avoid_stairs,
            accessible_only: self.accessible_only,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging(&LoggingConfig::from_env());
    // Exit code 2 is reserved for "not found", so usage errors exit with 1.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli).await {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    let db_path = match cli.db {
        Some(path) => path,
        None => default_database_path().context("failed to resolve default database path")?,
    };

    if let Command::InitDb = cli.command {
        return handle_init_db(&db_path);
    }

    let ctx = CommandContext::open(&db_path, cli.format)?;
    match cli.command {
        Command::Route(args) => {
            let origin = args
                .origin()
                .context("either --from or both --lat and --lon are required")?;
            handle_route(&ctx, &origin, &args.to, args.options()).await
        }
        Command::Reachable { from, max_distance } => {
            handle_reachable(&ctx, &from, max_distance).await
        }
        Command::Nearest {
            lat,
            lon,
            max_distance,
        } => handle_nearest(&ctx, lat, lon, max_distance).await,
        Command::Stats => handle_stats(&ctx).await,
        Command::InitDb => handle_init_db(&db_path),
    }
}
