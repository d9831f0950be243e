use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use pointmap::api::open_source;
use pointmap::config::FileConfig;
use pointmap::model::MapModel;
use pointmap::view::{Document, Filter, SvgSurface, ViewController};

/// Classify points against a map bounding box and render them as SVG
///
/// Examples:
///   # Render data.json in the current directory with the default box
///   pointmap
///
///   # Fetch points over HTTP and keep only those inside the box
///   pointmap --data https://example.com/points.json --filter inside -o inside.svg
///
///   # Print the classified points as JSON instead of writing SVG
///   pointmap --data points.json --json
#[derive(Parser, Debug)]
#[command(name = "pointmap")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches pointmap.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// URL or file path of the point records (defaults to data.json)
    #[arg(short = 'd', long)]
    data: Option<String>,

    /// Output SVG path (defaults to map.svg)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Which points to draw
    #[arg(short = 'f', long, value_enum)]
    filter: Option<Filter>,

    /// Seconds to wait for the point data before giving up
    #[arg(long)]
    timeout: Option<u64>,

    /// Print classified points as JSON instead of writing SVG
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let config = match args.config {
        Some(ref path) => FileConfig::from_path(path)?,
        None => FileConfig::load()?.unwrap_or_default(),
    };

    let verbose = args.verbose || config.verbose;
    init_logging(verbose);

    let data = args.data.clone().unwrap_or_else(|| config.data.clone());
    let filter = args.filter.unwrap_or(config.filter);
    let timeout = Duration::from_secs(args.timeout.unwrap_or(config.timeout_secs));
    let output = args
        .output
        .clone()
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| PathBuf::from("map.svg"));

    tracing::debug!(
        map = %config.name,
        data = %data,
        filter = ?filter,
        timeout_secs = timeout.as_secs(),
        "configuration resolved"
    );

    let source = open_source(&data).context("Failed to open point source")?;
    let model = MapModel::new(config.name.clone(), config.bbox.iter().copied(), source)
        .context("Invalid bounding box")?
        .with_timeout(timeout);

    let mut document = Document::new().with_surface(config.selector.clone(), SvgSurface::new());
    let mut controller =
        ViewController::new(&mut document, &config.selector, model, config.view_options())
            .context("Failed to attach to map surface")?;

    let spinner = create_spinner(&format!("Loading points from {}...", data));
    let start = Instant::now();
    if let Err(e) = controller.init().await {
        spinner.abandon_with_message(format!("Failed to load points from {}", data));
        let hint = if e.is_retryable() {
            "the error looks transient, try again"
        } else {
            "check the data source"
        };
        return Err(anyhow::Error::new(e).context(hint));
    }
    controller.set_filter(filter);

    let points = controller.model().get_points().await?;
    let summary = controller.model().summarize(&points);
    spinner.finish_with_message(format!(
        "Loaded {} points: {} inside, {} outside [{:.1}s]",
        summary.total(),
        summary.inside,
        summary.outside,
        start.elapsed().as_secs_f32()
    ));

    if args.json {
        let visible = controller.visible_points(&points);
        let json = serde_json::to_string_pretty(&visible)
            .context("Failed to serialize classified points")?;
        println!("{}", json);
        return Ok(());
    }

    let drawn = controller.visible_points(&points).len();
    let svg = controller.into_surface().to_svg();
    std::fs::write(&output, svg)
        .with_context(|| format!("Failed to write SVG file: {}", output.display()))?;

    println!(
        "Wrote {} of {} points ({:?} filter) to {} [{:.1}s]",
        drawn,
        summary.total(),
        filter,
        output.display(),
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
