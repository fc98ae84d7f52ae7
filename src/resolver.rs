//! Timestamp to location lookup over a chronological track.

use chrono::{DateTime, Utc};

use crate::error::LocateError;
use crate::gpx_types::{Location, TrackPoint};

/// Find where the logger was at `query`.
///
/// Walks the track in order and answers with the nearest preceding sample,
/// without interpolating between points. A query before the first point or
/// after the last one is clamped to that point and reported with
/// `matched == false`. A query exactly on the first point's timestamp counts
/// as out of range too.
pub fn resolve(points: &[TrackPoint], query: DateTime<Utc>) -> Result<Location, LocateError> {
    if points.len() < 2 {
        return Err(LocateError::InsufficientTrackPoints {
            found: points.len(),
        });
    }

    for (i, point) in points.iter().enumerate() {
        let next = points.get(i + 1);
        tracing::trace!(
            query = %query,
            point = %point.time,
            diff = (query - point.time).num_seconds(),
            "Comparing query with track point"
        );

        if (next.is_none() && query >= point.time) || query <= point.time {
            return Ok(location(point, false));
        }

        if let Some(next) = next
            && point.time <= query
            && query <= next.time
        {
            return Ok(location(point, true));
        }
    }

    Err(LocateError::Unresolved { query })
}

fn location(point: &TrackPoint, matched: bool) -> Location {
    Location {
        longitude: point.longitude,
        latitude: point.latitude,
        matched,
    }
}
