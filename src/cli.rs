use std::path::PathBuf;

/// Facility map console
#[derive(clap::Parser, Debug)]
#[command(name = "fieldmap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (TOML or JSON); defaults to the user config directory
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level selected by `-v` flags.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Fetch objects for one viewport and print the clusters as JSON
    Fetch(FetchArgs),

    /// Run a scripted drawing session and export the result as GeoJSON
    Replay(ReplayArgs),

    /// Write a config file holding the defaults
    InitConfig(InitConfigArgs),
}

#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    /// Viewport center latitude
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Viewport center longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Zoom level
    #[arg(short, long)]
    pub zoom: Option<u8>,

    /// Object query endpoint, overriding the config
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Category labels to request (repeat or comma-separate)
    #[arg(long = "category", value_delimiter = ',')]
    pub categories: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct ReplayArgs {
    /// Replay script (JSON array of steps)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub script: PathBuf,

    /// Output GeoJSON file; "-" writes to stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct InitConfigArgs {
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
