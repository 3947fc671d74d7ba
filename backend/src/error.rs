use thiserror::Error;

use crate::route_file::RouteFileError;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route needs at least two points, got {0}")]
    TooFewPoints(usize),
    #[error("point {index} is out of range: lat={lat}, lng={lng}")]
    InvalidCoordinate { index: usize, lat: f64, lng: f64 },
    #[error("interpolated route would have {count} points, the limit is {max}")]
    TooManyPoints { count: usize, max: usize },
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
    #[error(transparent)]
    File(#[from] RouteFileError),
}
