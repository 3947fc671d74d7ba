use std::{io, path::PathBuf};

use clap::Parser;
use mock_route::{
    models::{SimulationParams, DEFAULT_ACCURACY_M},
    playback::{run_playback, JsonLinesSink, Playback, PlaybackSettings},
    route_file,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Replay an interpolated route as mock location fixes (JSON lines on stdout)"
)]
struct Args {
    /// Interpolated route JSON produced by interpolate_route or the server
    #[arg(long)]
    route: PathBuf,

    /// Reported speed in km/h; falls back to 30 when missing or unparseable
    #[arg(long, allow_hyphen_values = true)]
    speed: Option<String>,

    /// Milliseconds between fixes; falls back to 1000 when missing or unparseable
    #[arg(long, allow_hyphen_values = true)]
    interval: Option<String>,

    /// Reported horizontal accuracy in meters
    #[arg(long, default_value_t = DEFAULT_ACCURACY_M)]
    accuracy: f64,

    /// Stop after this many fixes instead of looping until Ctrl-C
    #[arg(long)]
    limit: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout carries only fixes.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let params = SimulationParams::from_inputs(args.speed.as_deref(), args.interval.as_deref());
    let settings = PlaybackSettings::from_params(params, args.accuracy);

    let route = route_file::read_route(&args.route)?;
    let playback = Playback::new(route, settings)?;
    tracing::info!(
        speed_kmh = settings.speed_kmh,
        interval_ms = settings.interval_ms,
        accuracy_m = settings.accuracy_m,
        "replaying {:?}",
        args.route
    );
    let mut sink = JsonLinesSink::new(io::stdout().lock());

    tokio::select! {
        result = run_playback(playback, &mut sink, args.limit) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, stopping playback");
        }
    }

    Ok(())
}
