use chrono::SecondsFormat;
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

use crate::gpx_types::{TrackLog, TrackPoint};
use crate::options::ExportOptions;

/// Convert a parsed track to a GeoJSON FeatureCollection.
///
/// An empty track gives no features, a single point a `Point` feature and
/// anything longer one `LineString`.
pub fn to_feature_collection(track: &TrackLog, opts: &ExportOptions) -> FeatureCollection {
    let features = match track.points() {
        [] => Vec::new(),
        [point] => vec![point_feature(point, opts)],
        points => vec![line_feature(points, opts)],
    };

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn point_feature(pt: &TrackPoint, opts: &ExportOptions) -> Feature {
    let geometry = Geometry::new(Value::Point(point_coords(pt, opts.include_elevation)));

    let mut props = track_props();
    if opts.include_time {
        props.insert("time".to_string(), JsonValue::String(format_time(pt)));
    }

    feature(geometry, props)
}

fn line_feature(points: &[TrackPoint], opts: &ExportOptions) -> Feature {
    let coords: Vec<Vec<f64>> = points
        .iter()
        .map(|pt| point_coords(pt, opts.include_elevation))
        .collect();
    let geometry = Geometry::new(Value::LineString(coords));

    let mut props = track_props();
    if opts.include_time {
        let times = points
            .iter()
            .map(|pt| JsonValue::String(format_time(pt)))
            .collect();
        let mut coord_props = Map::new();
        coord_props.insert("times".to_string(), JsonValue::Array(times));
        props.insert(
            "coordinateProperties".to_string(),
            JsonValue::Object(coord_props),
        );
    }

    feature(geometry, props)
}

fn feature(geometry: Geometry, props: Map<String, JsonValue>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

fn track_props() -> Map<String, JsonValue> {
    let mut props = Map::new();
    props.insert(
        "gpxType".to_string(),
        JsonValue::String("track".to_string()),
    );
    props
}

/// Build [lon, lat] or [lon, lat, ele] coordinate array.
fn point_coords(pt: &TrackPoint, include_elevation: bool) -> Vec<f64> {
    if include_elevation {
        vec![pt.longitude, pt.latitude, pt.elevation]
    } else {
        vec![pt.longitude, pt.latitude]
    }
}

fn format_time(pt: &TrackPoint) -> String {
    pt.time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
