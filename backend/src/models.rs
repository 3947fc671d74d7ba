pub use shared::{
    ApiError, GeoPoint, InterpolateRequest, InterpolatedRouteResponse, NumericInput,
    SimulationParams, DEFAULT_ACCURACY_M, DEFAULT_INTERVAL_MS, DEFAULT_SPEED_KMH,
};

use crate::error::RouteError;
use crate::interpolation::{approximate_distance_km, interpolate_route, interpolated_len};

pub const MIN_ROUTE_POINTS: usize = 2;
pub const MAX_INTERPOLATED_POINTS: usize = 1_000_000;

/// A user-drawn route: start, via points in order, end.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points: Vec<GeoPoint>,
}

impl Route {
    pub fn new(points: Vec<GeoPoint>) -> Result<Self, RouteError> {
        if points.len() < MIN_ROUTE_POINTS {
            return Err(RouteError::TooFewPoints(points.len()));
        }
        if let Some((index, point)) = points.iter().enumerate().find(|(_, p)| !p.is_valid()) {
            return Err(RouteError::InvalidCoordinate {
                index,
                lat: point.lat,
                lng: point.lng,
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn distance_km(&self) -> f64 {
        approximate_distance_km(&self.points)
    }

    /// Fails with `TooManyPoints` before allocating when the parameters would
    /// produce more than `MAX_INTERPOLATED_POINTS` points.
    pub fn interpolate(&self, params: &SimulationParams) -> Result<Vec<GeoPoint>, RouteError> {
        let count = interpolated_len(&self.points, params.speed_kmh, params.interval_ms);
        if count > MAX_INTERPOLATED_POINTS {
            return Err(RouteError::TooManyPoints {
                count,
                max: MAX_INTERPOLATED_POINTS,
            });
        }
        Ok(interpolate_route(&self.points, params.speed_kmh, params.interval_ms))
    }
}
