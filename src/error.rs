use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Fatal failure of a parse call. No track is produced.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("GPX buffer too small to be an XML document ({len} bytes)")]
    BufferTooSmall { len: usize },

    #[error("Failed to read GPX file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML document is not well-formed: {0}")]
    IllFormed(String),
}

impl ParseError {
    /// The input could not be obtained at all, as opposed to being bad XML.
    pub fn is_buffer_unavailable(&self) -> bool {
        matches!(self, Self::BufferTooSmall { .. } | Self::Io { .. })
    }
}

/// Failure of a location query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocateError {
    #[error("Track has {found} point(s), at least 2 are needed to locate a timestamp")]
    InsufficientTrackPoints { found: usize },

    #[error("No track segment covers {query}")]
    Unresolved { query: DateTime<Utc> },
}

impl From<ParseError> for JsValue {
    fn from(e: ParseError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

impl From<LocateError> for JsValue {
    fn from(e: LocateError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
