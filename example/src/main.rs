use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rheostat::{Algorithm, RangeController};
use tracing::{debug, info};

mod script;

use script::Script;

#[derive(Parser)]
#[command(name = "example")]
#[command(version, about = "Replays scripted drags against a rheostat", long_about = None)]
struct Cli {
    /// TOML script with `[args]` and `[[steps]]` (runs the built-in demo if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Scale algorithm: linear, log, log10, quadratic or timesFour
    #[arg(short, long)]
    algorithm: Option<Algorithm>,
    /// Start with the domain minimum at the leading edge
    #[arg(long)]
    flipped: Option<bool>,
    /// Disable snapping
    #[arg(long)]
    free: bool,
    /// Decimal digits kept in reported values
    #[arg(long)]
    precision: Option<u32>,
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new("error,rheostat=info,example=info") {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut script = match &cli.config {
        Some(path) => Script::load(path)?,
        None => Script::demo()?,
    };
    if let Some(algorithm) = cli.algorithm {
        script.args.algorithm = algorithm;
    }
    if let Some(flipped) = cli.flipped {
        script.args.flipped = flipped;
    }
    if cli.free {
        script.args.should_snap = false;
    }
    if let Some(precision) = cli.precision {
        script.args.value_precision = precision;
    }
    debug!(args = ?script.args, steps = script.steps.len(), "script loaded");

    let mut controller = RangeController::new(script.args)?;
    let changes = controller.changes();
    controller.subscribe(|change: rheostat::RangeChange| {
        info!(
            top = change.top_value,
            bottom = change.bottom_value,
            "values changed"
        );
    });

    script::run(&mut controller, &script.steps);

    info!(
        published = changes.sequence(),
        last = ?changes.take(),
        "script finished"
    );
    Ok(())
}
