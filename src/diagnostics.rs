//! Non-fatal reports raised while interpreting a GPX document.

use thiserror::Error;

/// A recoverable problem in the input. The offending point or element is
/// skipped and parsing carries on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedInput {
    #[error("broken gpx file, trkpt element has no attributes")]
    MissingAttributes,

    #[error("broken gpx file, trkpt element is missing the '{attribute}' attribute")]
    MissingCoordinate { attribute: &'static str },

    #[error("broken gpx file, invalid number '{value}' for {field}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("broken gpx file, failed to parse ISO-8601 time '{value}' for trackpoint")]
    InvalidTime { value: String },

    #[error("broken gpx file, new trkpt element before the previous ended")]
    NestedTrackPoint,

    #[error("broken gpx file, element '{element}' found outside of trkpt")]
    OutsideTrackPoint { element: &'static str },
}

/// Collects reports in the order they were raised and logs each one.
#[derive(Debug, Default)]
pub struct Diagnostics {
    reports: Vec<MalformedInput>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, issue: MalformedInput) {
        tracing::warn!(%issue, "Skipping malformed GPX input");
        self.reports.push(issue);
    }

    pub fn reports(&self) -> &[MalformedInput] {
        &self.reports
    }

    pub fn into_reports(self) -> Vec<MalformedInput> {
        self.reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_keep_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(MalformedInput::NestedTrackPoint);
        diagnostics.report(MalformedInput::OutsideTrackPoint { element: "time" });

        assert_eq!(
            diagnostics.reports(),
            &[
                MalformedInput::NestedTrackPoint,
                MalformedInput::OutsideTrackPoint { element: "time" },
            ]
        );
    }

    #[test]
    fn test_message_text() {
        let issue = MalformedInput::OutsideTrackPoint { element: "ele" };
        assert_eq!(
            issue.to_string(),
            "broken gpx file, element 'ele' found outside of trkpt"
        );
    }
}
