use std::{fs::File, path::PathBuf};

use clap::Parser;
use mock_route::{
    gpx_export::write_gpx,
    models::{Route, SimulationParams},
    route_file,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Densify a sparse route into one point per sample interval"
)]
struct Args {
    /// JSON array of {"lat", "lng"} points: start, via points, end
    #[arg(long)]
    input: PathBuf,

    /// Where the interpolated route JSON should be written
    #[arg(long)]
    output: PathBuf,

    /// Speed in km/h; falls back to 30 when missing or unparseable
    #[arg(long, allow_hyphen_values = true)]
    speed: Option<String>,

    /// Sample interval in milliseconds; falls back to 1000 when missing or unparseable
    #[arg(long, allow_hyphen_values = true)]
    interval: Option<String>,

    /// Also write the interpolated route as a GPX track
    #[arg(long)]
    gpx: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let params = SimulationParams::from_inputs(args.speed.as_deref(), args.interval.as_deref());

    let route = Route::new(route_file::read_route(&args.input)?)?;
    tracing::info!(
        "interpolating {} points ({:.3} km) at {} km/h every {} ms",
        route.points().len(),
        route.distance_km(),
        params.speed_kmh,
        params.interval_ms
    );

    let path = route.interpolate(&params)?;
    route_file::write_route(&args.output, &path)?;
    tracing::info!("wrote {} points to {:?}", path.len(), args.output);

    if let Some(gpx_path) = &args.gpx {
        write_gpx(&path, File::create(gpx_path)?)?;
        tracing::info!("wrote GPX track to {:?}", gpx_path);
    }

    Ok(())
}
