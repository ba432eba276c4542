use banner_core::platform::Bounds;
use banner_core::SlideDirection;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionArg {
    Top,
    Bottom,
}

impl From<DirectionArg> for SlideDirection {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Top => SlideDirection::Top,
            DirectionArg::Bottom => SlideDirection::Bottom,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "banner",
    version = banner_core::version(),
    about = "Presents a scripted sequence of transient banners on a headless overlay host",
)]
pub struct Args {
    /// Specify custom configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Validate configuration and exit without presenting anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Use default configuration and ignore config files
    #[arg(long = "defaults")]
    pub use_defaults: bool,

    /// Log everything, including trace output
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log info, warnings and errors
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Text shown in each banner
    #[arg(short = 'm', long, default_value = "Hello from banner")]
    pub message: String,

    /// Number of banners to present, each replacing the previous one
    #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,

    /// Delay between consecutive banners
    #[arg(long = "interval-ms", value_name = "MS", default_value_t = 1000)]
    pub interval_ms: u64,

    /// Seconds each banner stays up before dismissing itself
    #[arg(short = 'd', long, value_name = "SECONDS")]
    pub duration: Option<f64>,

    /// Preferred banner height in points
    #[arg(long, default_value_t = 80.0)]
    pub height: f64,

    /// Edge the banners slide in from
    #[arg(long, value_enum)]
    pub direction: Option<DirectionArg>,

    /// Show and hide banners without animating
    #[arg(long = "no-animate")]
    pub no_animate: bool,

    /// Size of the simulated screen, as WIDTHxHEIGHT
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value = "320x568", value_parser = parse_screen)]
    pub screen: Bounds,
}

fn parse_screen(value: &str) -> Result<Bounds, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let width: f64 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{width}'"))?;
    let height: f64 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{height}'"))?;
    if !(width > 0.0 && height > 0.0) {
        return Err("screen dimensions must be positive".into());
    }
    Ok(Bounds::new(0.0, 0.0, width, height))
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(path: PathBuf) -> PathBuf {
    if let (Ok(rest), Some(home)) = (path.strip_prefix("~"), dirs::home_dir()) {
        return home.join(rest);
    }
    path
}

pub fn parse_args() -> Args {
    Args::parse()
}
