pub mod builder;
pub mod converter;
pub mod diagnostics;
pub mod error;
pub mod gpx_types;
pub mod interpreter;
pub mod options;
pub mod parser;
pub mod resolver;

use chrono::{DateTime, Utc};
use wasm_bindgen::prelude::*;

pub use crate::diagnostics::MalformedInput;
pub use crate::error::{LocateError, ParseError};
pub use crate::gpx_types::{GpxData, Location, TrackLog, TrackPoint};
pub use crate::parser::{parse_file, parse_gpx};

use crate::options::ExportOptions;

/// A parsed GPX track held on the Rust side. Release it with `free()`.
#[wasm_bindgen]
pub struct GpxTrack {
    data: GpxData,
}

/// Parse raw GPX bytes into a track handle.
#[wasm_bindgen(js_name = parseGpx)]
pub fn parse_gpx_js(buffer: &[u8]) -> Result<GpxTrack, JsValue> {
    console_error_panic_hook::set_once();

    let data = parser::parse_gpx(buffer)?;
    Ok(GpxTrack { data })
}

#[wasm_bindgen]
impl GpxTrack {
    #[wasm_bindgen(getter, js_name = pointCount)]
    pub fn point_count(&self) -> usize {
        self.data.track.len()
    }

    /// Messages for every malformed element skipped while parsing.
    #[wasm_bindgen(getter)]
    pub fn diagnostics(&self) -> Vec<String> {
        self.data
            .diagnostics
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// All track points as plain JS objects.
    pub fn points(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.data.track.points())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Location at the instant of a JS `Date`.
    pub fn locate(&self, date: &js_sys::Date) -> Result<JsValue, JsValue> {
        let millis = date.get_time();
        if !millis.is_finite() {
            return Err(JsValue::from_str("Invalid Date"));
        }
        let at = DateTime::<Utc>::from_timestamp_millis(millis as i64)
            .ok_or_else(|| JsValue::from_str("Date out of range"))?;
        self.locate_at(at)
    }

    /// Location at an ISO-8601 timestamp string.
    #[wasm_bindgen(js_name = locateIso)]
    pub fn locate_iso(&self, timestamp: &str) -> Result<JsValue, JsValue> {
        let at = builder::parse_timestamp(timestamp).ok_or_else(|| {
            JsValue::from_str(&format!("Invalid ISO-8601 timestamp '{timestamp}'"))
        })?;
        self.locate_at(at)
    }

    /// Export the track as GeoJSON, returned as a JS object.
    #[wasm_bindgen(js_name = toGeoJson)]
    pub fn to_geojson(&self, options: JsValue) -> Result<JsValue, JsValue> {
        let opts = parse_options(options)?;
        let fc = converter::to_feature_collection(&self.data.track, &opts);
        serde_wasm_bindgen::to_value(&fc).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Export the track as GeoJSON, returned as a JSON string.
    #[wasm_bindgen(js_name = toGeoJsonString)]
    pub fn to_geojson_string(&self, options: JsValue) -> Result<String, JsValue> {
        let opts = parse_options(options)?;
        let fc = converter::to_feature_collection(&self.data.track, &opts);
        serde_json::to_string(&fc).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl GpxTrack {
    fn locate_at(&self, at: DateTime<Utc>) -> Result<JsValue, JsValue> {
        let location = self.data.track.locate(at)?;
        serde_wasm_bindgen::to_value(&location).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

fn parse_options(options: JsValue) -> Result<ExportOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(ExportOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
