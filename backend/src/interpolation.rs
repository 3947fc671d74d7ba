use crate::models::GeoPoint;

/// Mean Earth radius, matching the spherical model used for distances.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Below this, `sin(d)` is treated as zero and the great circle is undefined.
const ANTIPODAL_EPSILON: f64 = 1e-12;

/// Densify `route` into one point per simulated sample interval.
///
/// Each segment `(A, B)` is split into
/// `max(1, floor(distance / step_distance))` steps, where `step_distance`
/// is the distance travelled at `speed_kmh` during `interval_ms`. A point is
/// emitted at every fraction `step / steps` for `step in 0..steps`, so the
/// segment end is never emitted by the segment itself; the last route point
/// is appended exactly once at the end.
///
/// Non-positive speed or interval collapses every segment to a single step.
/// Routes shorter than two points are passed through unchanged.
pub fn interpolate_route(route: &[GeoPoint], speed_kmh: f64, interval_ms: i64) -> Vec<GeoPoint> {
    let Some(&last) = route.last() else {
        return Vec::new();
    };

    let step_distance_m = step_distance_m(speed_kmh, interval_ms);

    let mut path = Vec::new();
    for pair in route.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let steps = segment_steps(haversine_m(start, end), step_distance_m);
        for step in 0..steps {
            let fraction = step as f64 / steps as f64;
            path.push(slerp(start, end, fraction));
        }
    }
    path.push(last);

    tracing::debug!(
        input = route.len(),
        output = path.len(),
        step_distance_m,
        "interpolated route"
    );
    path
}

/// Length of the path `interpolate_route` would produce, without building it.
/// Saturates at `usize::MAX`.
pub fn interpolated_len(route: &[GeoPoint], speed_kmh: f64, interval_ms: i64) -> usize {
    if route.is_empty() {
        return 0;
    }
    let step_distance_m = step_distance_m(speed_kmh, interval_ms);
    route
        .windows(2)
        .map(|pair| segment_steps(haversine_m(pair[0], pair[1]), step_distance_m))
        .fold(1usize, usize::saturating_add)
}

fn step_distance_m(speed_kmh: f64, interval_ms: i64) -> f64 {
    let speed_mps = speed_kmh / 3.6;
    speed_mps * (interval_ms as f64 / 1000.0)
}

/// Number of samples for a segment of `distance_m`, never less than one.
pub fn segment_steps(distance_m: f64, step_distance_m: f64) -> usize {
    if !(step_distance_m.is_finite() && step_distance_m > 0.0) {
        return 1;
    }
    let ratio = (distance_m / step_distance_m).floor();
    if !ratio.is_finite() || ratio < 1.0 {
        return 1;
    }
    // Saturating cast for absurdly small step distances.
    ratio as usize
}

/// Central angle between two points in radians (haversine form).
pub fn angular_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlng = (b.lng - a.lng).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlng = (dlng / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    // Rounding can push h marginally above 1 for antipodes.
    2.0 * h.sqrt().min(1.0).asin()
}

pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    EARTH_RADIUS_M * angular_distance(a, b)
}

pub fn approximate_distance_km(path: &[GeoPoint]) -> f64 {
    path.windows(2).map(|w| haversine_m(w[0], w[1])).sum::<f64>() / 1000.0
}

/// Spherical linear interpolation along the great circle from `start` to
/// `end`. `fraction` is the share of the angular distance travelled.
pub fn slerp(start: GeoPoint, end: GeoPoint, fraction: f64) -> GeoPoint {
    let d = angular_distance(start, end);
    if d == 0.0 {
        return start;
    }

    let sin_d = d.sin();
    if sin_d.abs() < ANTIPODAL_EPSILON {
        return GeoPoint {
            lat: start.lat + (end.lat - start.lat) * fraction,
            lng: start.lng + (end.lng - start.lng) * fraction,
        };
    }

    let lat1 = start.lat.to_radians();
    let lng1 = start.lng.to_radians();
    let lat2 = end.lat.to_radians();
    let lng2 = end.lng.to_radians();

    let a = ((1.0 - fraction) * d).sin() / sin_d;
    let b = (fraction * d).sin() / sin_d;

    let x = a * lat1.cos() * lng1.cos() + b * lat2.cos() * lng2.cos();
    let y = a * lat1.cos() * lng1.sin() + b * lat2.cos() * lng2.sin();
    let z = a * lat1.sin() + b * lat2.sin();

    GeoPoint {
        lat: z.atan2((x * x + y * y).sqrt()).to_degrees(),
        lng: y.atan2(x).to_degrees(),
    }
}
