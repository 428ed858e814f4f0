use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vehicle_inspect_domain::PhotoKind;

/// Vehicle damage inspections: pickup/return photos, priced damage, overlays
#[derive(Debug, Parser)]
#[command(name = "vehicle-inspect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Extra config file, applied over XDG and project configs
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SQLite catalog path (overrides [catalog] path)
    #[arg(long, global = true, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a new inspection and print its id
    Create,
    /// Attach one photo to an inspection
    AddPhoto {
        inspection: String,
        file: PathBuf,
        /// Vehicle side, e.g. front, rear, left
        #[arg(long)]
        side: Option<String>,
        /// pickup or return
        #[arg(long = "type", value_name = "TYPE", value_parser = parse_kind)]
        kind: Option<PhotoKind>,
    },
    /// Add every `<type>_<side>` or `<type>/<side>` image below a folder
    Import { inspection: String, folder: PathBuf },
    /// Detect and price damage on return photos
    Analyze {
        inspection: String,
        #[arg(long)]
        json: bool,
    },
    /// Print photos and stored results
    Show {
        inspection: String,
        #[arg(long)]
        json: bool,
    },
    /// List inspections
    List,
    /// Draw issue overlays and write them as PNG files
    Annotate {
        inspection: String,
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
    },
}

fn parse_kind(value: &str) -> Result<PhotoKind, String> {
    value.parse::<PhotoKind>().map_err(|error| error.to_string())
}
