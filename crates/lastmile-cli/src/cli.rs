//! CLI argument definitions for lastmile.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `matrix` | One-to-many (or many-to-one) duration matrix |
//! | `direct-path` | Single door-to-door itinerary |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--config` | env | JSON provider settings file |
//! | `--provider` | only configured | Provider name to query |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! # Durations from a station to two addresses
//! lastmile matrix --from 48.8443,2.3743,stop_area:gare_de_lyon \
//!     --to 48.8530,2.3691 --to 48.8606,2.3376 --pretty
//!
//! # Bike ride arriving at 9:00
//! lastmile direct-path --from 48.8443,2.3743 --to 48.8606,2.3376 \
//!     --datetime 2024-03-10T09:00:00Z --arrive-by
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lastmile_core::{Place, StreetNetworkMode, UtcDateTime};

/// Query external street-network providers for last-mile legs.
///
/// Without `--config`, a single Geovelo provider named `geovelo` is built
/// from the `LASTMILE_GEOVELO_*` environment variables.
#[derive(Debug, Parser)]
#[command(
    name = "lastmile",
    author,
    version,
    about = "Street-network delegation CLI"
)]
pub struct Cli {
    /// JSON file listing provider settings.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Configured provider to query.
    ///
    /// May be omitted when exactly one provider is configured.
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute travel durations between one place and many others.
    ///
    /// # Examples
    ///
    ///   lastmile matrix --from 48.85,2.35 --to 48.86,2.36 --to 48.87,2.37
    ///   lastmile matrix --from 48.85,2.35 --to 48.86,2.36 --reverse
    Matrix(MatrixArgs),

    /// Compute a single itinerary between two places.
    ///
    /// # Examples
    ///
    ///   lastmile direct-path --from 48.85,2.35 --to 48.86,2.36 --datetime 2024-03-10T08:00:00Z
    DirectPath(DirectPathArgs),
}

#[derive(Debug, Args)]
pub struct MatrixArgs {
    /// Single place as `lat,lon[,uri]`.
    #[arg(long)]
    pub from: Place,

    /// Other places as `lat,lon[,uri]`, in output order.
    #[arg(long = "to", required = true)]
    pub to: Vec<Place>,

    #[arg(long, default_value_t = StreetNetworkMode::Bike)]
    pub mode: StreetNetworkMode,

    /// Seconds.
    #[arg(long, default_value_t = 1_800)]
    pub max_duration: u32,

    /// Route from every `--to` place towards `--from` instead.
    #[arg(long, default_value_t = false)]
    pub reverse: bool,
}

#[derive(Debug, Args)]
pub struct DirectPathArgs {
    #[arg(long)]
    pub from: Place,

    #[arg(long)]
    pub to: Place,

    /// RFC3339 UTC timestamp.
    #[arg(long, value_parser = parse_datetime)]
    pub datetime: UtcDateTime,

    /// Treat `--datetime` as the arrival time.
    #[arg(long, default_value_t = false)]
    pub arrive_by: bool,

    #[arg(long, default_value_t = StreetNetworkMode::Bike)]
    pub mode: StreetNetworkMode,
}

fn parse_datetime(value: &str) -> Result<UtcDateTime, String> {
    UtcDateTime::parse(value).map_err(|error| error.to_string())
}
