use std::io::Write;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};

use crate::error::RouteError;
use crate::models::GeoPoint;

const CREATOR: &str = "mock_route";

pub fn encode_route_as_gpx(path: &[GeoPoint]) -> Result<String, RouteError> {
    let mut buffer = Vec::new();
    write_gpx(path, &mut buffer)?;
    Ok(BASE64.encode(buffer))
}

/// Writes `path` as a GPX 1.1 document with a single track segment.
pub fn write_gpx(path: &[GeoPoint], writer: impl Write) -> Result<(), RouteError> {
    let mut gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some(CREATOR.into()),
        ..Default::default()
    };
    let mut track = Track {
        name: Some("simulated route".into()),
        ..Default::default()
    };

    let mut segment = TrackSegment::new();
    segment.points.extend(path.iter().map(to_waypoint));
    track.segments.push(segment);
    gpx.tracks.push(track);

    gpx::write(&gpx, writer)?;
    Ok(())
}

fn to_waypoint(point: &GeoPoint) -> Waypoint {
    Waypoint::new(Point::new(point.lng, point.lat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpx_contains_every_point() {
        let path = vec![
            GeoPoint::new(35.0, 139.0),
            GeoPoint::new(35.005, 139.0),
            GeoPoint::new(35.01, 139.0),
        ];
        let mut buffer = Vec::new();
        write_gpx(&path, &mut buffer).unwrap();

        let parsed = gpx::read(buffer.as_slice()).unwrap();
        let points = &parsed.tracks[0].segments[0].points;
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].point().y(), 35.005);
        assert_eq!(points[1].point().x(), 139.0);
    }

    #[test]
    fn test_encoded_gpx_is_base64() {
        let encoded = encode_route_as_gpx(&[GeoPoint::new(1.0, 2.0)]).unwrap();
        let decoded = BASE64.decode(encoded).unwrap();
        assert!(String::from_utf8(decoded).unwrap().contains("<gpx"));
    }
}
