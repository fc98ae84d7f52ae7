use chrono::{DateTime, NaiveDateTime, Utc};

use crate::diagnostics::{Diagnostics, MalformedInput};
use crate::gpx_types::TrackPoint;

/// Accumulates the attributes and child text of one `<trkpt>` until the
/// element closes.
///
/// An invalid builder keeps accepting input so that its children are still
/// recognised, but [`finish`](Self::finish) will discard it.
#[derive(Debug, Clone)]
pub struct TrackPointBuilder {
    longitude: Option<f64>,
    latitude: Option<f64>,
    elevation: f64,
    time: DateTime<Utc>,
    valid: bool,
}

impl TrackPointBuilder {
    /// Start a point from the `<trkpt>` attributes. Returns `None` when the
    /// element has no attributes at all.
    pub fn begin(attributes: &[(&str, &str)], diagnostics: &mut Diagnostics) -> Option<Self> {
        if attributes.is_empty() {
            diagnostics.report(MalformedInput::MissingAttributes);
            return None;
        }

        // Outer Option: attribute seen. Inner Option: value parsed.
        let mut longitude: Option<Option<f64>> = None;
        let mut latitude: Option<Option<f64>> = None;

        for &(name, value) in attributes {
            let (field, slot) = match name {
                "lon" => ("lon", &mut longitude),
                "lat" => ("lat", &mut latitude),
                _ => continue,
            };
            let parsed = parse_decimal(value);
            if parsed.is_none() {
                diagnostics.report(MalformedInput::InvalidNumber {
                    field,
                    value: value.to_string(),
                });
            }
            *slot = Some(parsed);
        }

        for (attribute, seen) in [("lon", &longitude), ("lat", &latitude)] {
            if seen.is_none() {
                diagnostics.report(MalformedInput::MissingCoordinate { attribute });
            }
        }

        let longitude = longitude.flatten();
        let latitude = latitude.flatten();

        Some(Self {
            longitude,
            latitude,
            elevation: 0.0,
            time: DateTime::<Utc>::UNIX_EPOCH,
            valid: longitude.is_some() && latitude.is_some(),
        })
    }

    /// Text content of `<time>`.
    pub fn set_time(&mut self, text: &str, diagnostics: &mut Diagnostics) {
        match parse_timestamp(text) {
            Some(time) => self.time = time,
            None => {
                self.valid = false;
                diagnostics.report(MalformedInput::InvalidTime {
                    value: text.trim().to_string(),
                });
            }
        }
    }

    /// Text content of `<ele>`. Unparsable text reads as 0 and does not
    /// invalidate the point.
    pub fn set_elevation(&mut self, text: &str, diagnostics: &mut Diagnostics) {
        self.elevation = parse_decimal(text).unwrap_or_else(|| {
            diagnostics.report(MalformedInput::InvalidNumber {
                field: "ele",
                value: text.trim().to_string(),
            });
            0.0
        });
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Finalize the point, or `None` if a coordinate or the timestamp was
    /// broken. A point that never saw a `<time>` keeps the epoch.
    pub fn finish(self) -> Option<TrackPoint> {
        if !self.valid {
            return None;
        }
        let (Some(longitude), Some(latitude)) = (self.longitude, self.latitude) else {
            return None;
        };

        Some(TrackPoint {
            longitude,
            latitude,
            elevation: self.elevation,
            time: self.time,
        })
    }
}

/// Locale-independent decimal parse. Non-finite values are rejected.
pub fn parse_decimal(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parse an ISO-8601 timestamp such as `2011-06-05T12:30:00Z`.
///
/// Accepts RFC 3339, `+hhmm` offsets and optional fractional seconds.
/// Timestamps without any zone designator are taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(time.with_timezone(&Utc));
    }
    if let Ok(time) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(time.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
