use std::path::PathBuf;

use blast_zones::geo::Coordinate;
use clap::{Args, Parser, Subcommand};

pub const DEFAULT_DETONATION: &str = "40.7128,-74.0060";
pub const DEFAULT_OBSERVER: &str = "40.7580,-73.9855";

#[derive(Parser, Debug)]
#[command(name = "blast-zones", version, about = "Nuclear detonation effects on a terminal map")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "BLAST_ZONES_CATALOG",
        help = "JSON catalog replacing the built-in bomb table"
    )]
    pub catalog: Option<PathBuf>,
    #[arg(long, global = true, help = "Write logs to this file (RUST_LOG sets the level)")]
    pub log_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone)]
pub struct ScenarioArgs {
    #[arg(long, short, help = "Bomb name (defaults to the first catalog entry)")]
    pub bomb: Option<String>,
    #[arg(long, default_value = DEFAULT_DETONATION, allow_hyphen_values = true, help = "Ground zero as lat,lon")]
    pub detonation: Coordinate,
    #[arg(long, default_value = DEFAULT_OBSERVER, allow_hyphen_values = true, help = "Your location as lat,lon")]
    pub observer: Coordinate,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive terminal map (default)
    Tui {
        #[command(flatten)]
        scenario: ScenarioArgs,
    },
    /// List bombs in the catalog
    List,
    /// Yield, country, effect legend and terminology for a bomb
    Info { bomb: String },
    /// Classify the observer and print guidance
    Classify {
        #[command(flatten)]
        scenario: ScenarioArgs,
        #[arg(long, help = "Output machine-readable JSON")]
        json: bool,
    },
    /// Classify every `lat,lon` line of a file against one detonation
    Batch {
        file: PathBuf,
        #[arg(long, short)]
        bomb: Option<String>,
        #[arg(long, default_value = DEFAULT_DETONATION, allow_hyphen_values = true)]
        detonation: Coordinate,
    },
    /// Print rings and markers as GeoJSON
    Export {
        #[command(flatten)]
        scenario: ScenarioArgs,
        #[arg(long, default_value_t = 128, help = "Points per ring outline")]
        segments: usize,
    },
    /// Answer a JSON classify request from a file or stdin
    Respond { file: Option<PathBuf> },
}
