//! State machine turning XML parse events into track points.
//!
//! The interpreter knows nothing about the XML library: it is driven by
//! [`ParseEvent`]s, which makes it possible to exercise it with synthetic
//! event sequences.

use crate::builder::TrackPointBuilder;
use crate::diagnostics::{Diagnostics, MalformedInput};
use crate::gpx_types::{GpxData, TrackLog, TrackPoint};

/// One event from the XML source. Element names are local names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParseEvent<'a> {
    Start {
        name: &'a str,
        attributes: &'a [(&'a str, &'a str)],
    },
    End {
        name: &'a str,
    },
    Text(&'a str),
}

/// Which element's text is currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenElement {
    #[default]
    None,
    Time,
    Elevation,
}

/// State for a single parse call.
#[derive(Debug, Default)]
pub struct ParserContext {
    points: Vec<TrackPoint>,
    current: Option<TrackPointBuilder>,
    open: OpenElement,
    diagnostics: Diagnostics,
}

impl ParserContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_element(&self) -> OpenElement {
        self.open
    }

    pub fn has_point_in_progress(&self) -> bool {
        self.current.is_some()
    }

    pub fn handle(&mut self, event: ParseEvent<'_>) {
        match event {
            ParseEvent::Start { name, attributes } => self.start_element(name, attributes),
            ParseEvent::End { name } => self.end_element(name),
            ParseEvent::Text(text) => self.text(text),
        }
    }

    fn start_element(&mut self, name: &str, attributes: &[(&str, &str)]) {
        match name {
            "trkpt" => {
                if self.current.take().is_some() {
                    self.diagnostics.report(MalformedInput::NestedTrackPoint);
                }
                self.current = TrackPointBuilder::begin(attributes, &mut self.diagnostics);
                self.open = OpenElement::None;
            }
            "time" => self.open_child("time", OpenElement::Time),
            "ele" => self.open_child("ele", OpenElement::Elevation),
            _ => {}
        }
    }

    fn open_child(&mut self, element: &'static str, open: OpenElement) {
        if self.current.is_none() {
            self.diagnostics
                .report(MalformedInput::OutsideTrackPoint { element });
            return;
        }
        self.open = open;
    }

    fn end_element(&mut self, name: &str) {
        if name == "trkpt" {
            if let Some(point) = self.current.take().and_then(TrackPointBuilder::finish) {
                self.points.push(point);
            }
        }
        // Any closing tag clears the classification, even a nested one.
        self.open = OpenElement::None;
    }

    fn text(&mut self, text: &str) {
        let Some(builder) = self.current.as_mut() else {
            return;
        };
        match self.open {
            OpenElement::Time => builder.set_time(text, &mut self.diagnostics),
            OpenElement::Elevation => builder.set_elevation(text, &mut self.diagnostics),
            OpenElement::None => {}
        }
    }

    /// End of input. A point still in progress is dropped.
    pub fn finish(self) -> GpxData {
        GpxData {
            track: TrackLog::from_points(self.points),
            diagnostics: self.diagnostics.into_reports(),
        }
    }
}

/// Run a complete event sequence through a fresh context.
pub fn interpret<'a, I>(events: I) -> GpxData
where
    I: IntoIterator<Item = ParseEvent<'a>>,
{
    let mut context = ParserContext::new();
    for event in events {
        context.handle(event);
    }
    context.finish()
}
