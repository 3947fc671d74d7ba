use serde::{Deserialize, Serialize};

pub const DEFAULT_SPEED_KMH: f64 = 30.0;
pub const DEFAULT_INTERVAL_MS: i64 = 1_000;
pub const DEFAULT_ACCURACY_M: f64 = 5.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Speed and sample interval driving route interpolation and playback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub speed_kmh: f64,
    pub interval_ms: i64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl SimulationParams {
    /// Builds parameters from raw user text, substituting the defaults for
    /// anything missing or unparseable.
    pub fn from_inputs(speed_kmh: Option<&str>, interval_ms: Option<&str>) -> Self {
        Self {
            speed_kmh: parse_speed_kmh(speed_kmh),
            interval_ms: parse_interval_ms(interval_ms),
        }
    }

    pub fn speed_mps(&self) -> f64 {
        self.speed_kmh / 3.6
    }

    /// Distance covered during one sample interval, in meters.
    pub fn step_distance_m(&self) -> f64 {
        self.speed_mps() * (self.interval_ms as f64 / 1000.0)
    }
}

pub fn parse_speed_kmh(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(DEFAULT_SPEED_KMH)
}

pub fn parse_interval_ms(raw: Option<&str>) -> i64 {
    raw.map(str::trim)
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(DEFAULT_INTERVAL_MS)
}

/// A numeric form field that clients may send either as a JSON number or
/// as the text the user typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    pub fn as_text(&self) -> String {
        match self {
            NumericInput::Number(value) => value.to_string(),
            NumericInput::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpolateRequest {
    pub points: Vec<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_kmh: Option<NumericInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<NumericInput>,
}

impl InterpolateRequest {
    pub fn params(&self) -> SimulationParams {
        let speed = self.speed_kmh.as_ref().map(NumericInput::as_text);
        let interval = self.interval_ms.as_ref().map(NumericInput::as_text);
        SimulationParams::from_inputs(speed.as_deref(), interval.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpolatedRouteResponse {
    pub path: Vec<GeoPoint>,
    pub point_count: usize,
    pub distance_km: f64,
    pub params: SimulationParams,
    pub gpx_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}
