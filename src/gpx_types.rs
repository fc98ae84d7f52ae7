use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::diagnostics::MalformedInput;
use crate::error::LocateError;
use crate::resolver;

/// Result of parsing one GPX buffer: the track plus every non-fatal report.
#[derive(Debug, Default)]
pub struct GpxData {
    pub track: TrackLog,
    pub diagnostics: Vec<MalformedInput>,
}

/// A single GPS fix taken from a `<trkpt>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPoint {
    pub longitude: f64,
    pub latitude: f64,
    /// Meters; 0 when the point has no `<ele>`.
    pub elevation: f64,
    pub time: DateTime<Utc>,
}

/// Answer to a location query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
    /// `true` when the query fell between two recorded points, `false` when
    /// it was clamped to the nearest end of the track.
    pub matched: bool,
}

/// Track points in document order, flattened across all tracks and segments.
///
/// Built once by the parser and never mutated afterwards, so it can be
/// shared freely between readers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackLog {
    points: Vec<TrackPoint>,
}

impl TrackLog {
    pub(crate) fn from_points(points: Vec<TrackPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackPoint> {
        self.points.iter()
    }

    /// Where the logger was at `at`. Expects the track to be chronological.
    pub fn locate(&self, at: DateTime<Utc>) -> Result<Location, LocateError> {
        resolver::resolve(&self.points, at)
    }
}

impl<'a> IntoIterator for &'a TrackLog {
    type Item = &'a TrackPoint;
    type IntoIter = std::slice::Iter<'a, TrackPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
