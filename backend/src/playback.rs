//! Replays a persisted route as a looping stream of mock location fixes.
//!
//! Each tick publishes the next point of the route together with the
//! configured speed and accuracy. After the last point the cursor wraps to
//! the start, so a route plays until the caller stops it.

use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::{self, MissedTickBehavior};

use crate::models::{GeoPoint, SimulationParams, DEFAULT_ACCURACY_M};

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("cannot play back an empty route")]
    EmptyRoute,
    #[error("failed to publish fix: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode fix: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSettings {
    pub speed_kmh: f64,
    pub accuracy_m: f64,
    pub interval_ms: i64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self::from_params(SimulationParams::default(), DEFAULT_ACCURACY_M)
    }
}

impl PlaybackSettings {
    pub fn from_params(params: SimulationParams, accuracy_m: f64) -> Self {
        Self {
            speed_kmh: params.speed_kmh,
            accuracy_m,
            interval_ms: params.interval_ms,
        }
    }
}

/// One synthetic location fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockFix {
    pub sequence: u64,
    pub lat: f64,
    pub lng: f64,
    pub speed_mps: f64,
    pub accuracy_m: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Playback {
    route: Vec<GeoPoint>,
    settings: PlaybackSettings,
    cursor: usize,
    emitted: u64,
}

impl Playback {
    pub fn new(route: Vec<GeoPoint>, settings: PlaybackSettings) -> Result<Self, PlaybackError> {
        if route.is_empty() {
            return Err(PlaybackError::EmptyRoute);
        }
        Ok(Self {
            route,
            settings,
            cursor: 0,
            emitted: 0,
        })
    }

    pub fn point_count(&self) -> usize {
        self.route.len()
    }

    /// Delay between fixes, never shorter than one millisecond.
    pub fn tick_period(&self) -> Duration {
        let millis = u64::try_from(self.settings.interval_ms).unwrap_or(0).max(1);
        Duration::from_millis(millis)
    }

    pub fn next_fix(&mut self, timestamp: DateTime<Utc>) -> MockFix {
        if self.cursor >= self.route.len() {
            self.cursor = 0;
        }
        let point = self.route[self.cursor];
        self.cursor += 1;

        let fix = MockFix {
            sequence: self.emitted,
            lat: point.lat,
            lng: point.lng,
            speed_mps: self.settings.speed_kmh / 3.6,
            accuracy_m: self.settings.accuracy_m,
            timestamp,
        };
        self.emitted += 1;
        fix
    }
}

/// Destination for generated fixes.
pub trait LocationSink {
    fn publish(&mut self, fix: &MockFix) -> Result<(), PlaybackError>;
}

/// Writes each fix as one JSON object per line.
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LocationSink for JsonLinesSink<W> {
    fn publish(&mut self, fix: &MockFix) -> Result<(), PlaybackError> {
        serde_json::to_writer(&mut self.writer, fix)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl LocationSink for Vec<MockFix> {
    fn publish(&mut self, fix: &MockFix) -> Result<(), PlaybackError> {
        self.push(fix.clone());
        Ok(())
    }
}

/// Publishes one fix per tick until `limit` fixes went out or the sink
/// fails. The first fix is published immediately. Returns the number of
/// fixes published.
pub async fn run_playback(
    mut playback: Playback,
    sink: &mut impl LocationSink,
    limit: Option<u64>,
) -> Result<u64, PlaybackError> {
    let mut ticker = time::interval(playback.tick_period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        points = playback.point_count(),
        period_ms = playback.tick_period().as_millis() as u64,
        "starting playback"
    );

    let mut published = 0u64;
    while !limit.is_some_and(|limit| published >= limit) {
        ticker.tick().await;
        let fix = playback.next_fix(Utc::now());
        tracing::debug!(
            sequence = fix.sequence,
            lat = fix.lat,
            lng = fix.lng,
            "publishing fix"
        );
        sink.publish(&fix)?;
        published += 1;
    }

    tracing::info!(published, "playback finished");
    Ok(published)
}
