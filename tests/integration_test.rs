use chrono::{DateTime, TimeZone, Utc};
use geojson::Value;
use gpx_geotag_wasm::converter::to_feature_collection;
use gpx_geotag_wasm::options::ExportOptions;
use gpx_geotag_wasm::{
    GpxData, LocateError, MalformedInput, ParseError, parse_file, parse_gpx,
};

fn load_fixture(path: &str) -> Vec<u8> {
    std::fs::read(format!("tests/fixtures/{path}")).unwrap()
}

fn parse_fixture(path: &str) -> GpxData {
    parse_gpx(&load_fixture(path)).unwrap()
}

fn at(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2011, 6, 5, hour, min, sec).unwrap()
}

#[test]
fn test_walk_points() {
    let data = parse_fixture("walk.gpx");
    assert_eq!(data.track.len(), 5);

    let points = data.track.points();
    assert!((points[0].latitude - 48.2082).abs() < 1e-9);
    assert!((points[0].longitude - 16.3738).abs() < 1e-9);
    assert!((points[0].elevation - 171.0).abs() < 1e-9);
    assert_eq!(points[0].time, at(12, 30, 0));
    // Second segment continues the same track.
    assert_eq!(points[3].elevation, 0.0);
    assert_eq!(points[4].time, at(12, 41, 0));

    // The metadata <time> is outside any trkpt.
    assert_eq!(
        data.diagnostics,
        vec![MalformedInput::OutsideTrackPoint { element: "time" }]
    );
}

#[test]
fn test_walk_locate() {
    let data = parse_fixture("walk.gpx");

    let loc = data.track.locate(at(12, 30, 30)).unwrap();
    assert!(loc.matched);
    assert!((loc.latitude - 48.2082).abs() < 1e-9);

    let loc = data.track.locate(at(12, 35, 0)).unwrap();
    assert!(loc.matched);
    assert!((loc.latitude - 48.2095).abs() < 1e-9);

    let loc = data.track.locate(at(12, 0, 0)).unwrap();
    assert!(!loc.matched);
    assert!((loc.latitude - 48.2082).abs() < 1e-9);

    let loc = data.track.locate(at(12, 30, 0)).unwrap();
    assert!(!loc.matched);
    assert!((loc.latitude - 48.2082).abs() < 1e-9);

    let loc = data.track.locate(at(13, 0, 0)).unwrap();
    assert!(!loc.matched);
    assert!((loc.latitude - 48.2108).abs() < 1e-9);
    assert!((loc.longitude - 16.3783).abs() < 1e-9);
}

#[test]
fn test_parse_file() {
    let data = parse_file("tests/fixtures/walk.gpx").unwrap();
    assert_eq!(data.track, parse_fixture("walk.gpx").track);
}

#[test]
fn test_broken_points_skipped() {
    let data = parse_fixture("broken_points.gpx");

    assert_eq!(data.track.len(), 2);
    let lats: Vec<f64> = data.track.iter().map(|p| p.latitude).collect();
    assert_eq!(lats, vec![48.2082, 48.2095]);
    assert_eq!(data.track.points()[1].elevation, 0.0);

    assert_eq!(
        data.diagnostics,
        vec![
            MalformedInput::MissingCoordinate { attribute: "lon" },
            MalformedInput::InvalidTime {
                value: "sometime in June".to_string(),
            },
            MalformedInput::MissingAttributes,
            MalformedInput::OutsideTrackPoint { element: "time" },
            MalformedInput::InvalidNumber {
                field: "ele",
                value: "unknown".to_string(),
            },
        ]
    );
}

#[test]
fn test_nested_trkpt() {
    let data = parse_fixture("nested_trkpt.gpx");

    let nested = data
        .diagnostics
        .iter()
        .filter(|d| **d == MalformedInput::NestedTrackPoint)
        .count();
    assert_eq!(nested, 1);
    assert_eq!(data.diagnostics.len(), 1);

    let lons: Vec<f64> = data.track.iter().map(|p| p.longitude).collect();
    assert_eq!(lons, vec![21.0, 22.0]);
}

#[test]
fn test_truncated_document_fails() {
    let err = parse_gpx(&load_fixture("truncated.gpx")).unwrap_err();
    assert!(!err.is_buffer_unavailable());
    assert!(matches!(err, ParseError::IllFormed(_) | ParseError::Xml(_)));
}

#[test]
fn test_empty_buffer_fails() {
    let err = parse_gpx(b"").unwrap_err();
    assert!(err.is_buffer_unavailable());
}

#[test]
fn test_locate_needs_two_points() {
    let empty = parse_gpx(br#"<?xml version="1.0"?><gpx version="1.1"></gpx>"#).unwrap();
    assert_eq!(
        empty.track.locate(at(12, 0, 0)),
        Err(LocateError::InsufficientTrackPoints { found: 0 })
    );

    let single = parse_gpx(
        br#"<gpx><trkpt lat="1.0" lon="2.0"><time>2011-06-05T12:00:00Z</time></trkpt></gpx>"#,
    )
    .unwrap();
    assert_eq!(
        single.track.locate(at(12, 0, 0)),
        Err(LocateError::InsufficientTrackPoints { found: 1 })
    );
}

#[test]
fn test_reparse_is_deterministic() {
    let buffer = load_fixture("walk.gpx");
    let first = parse_gpx(&buffer).unwrap();
    let second = parse_gpx(&buffer).unwrap();

    assert_eq!(first.track, second.track);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn test_geojson_export() {
    let data = parse_fixture("walk.gpx");
    let fc = to_feature_collection(&data.track, &ExportOptions::default());

    assert_eq!(fc.features.len(), 1);
    let f = &fc.features[0];
    match &f.geometry.as_ref().unwrap().value {
        Value::LineString(coords) => {
            assert_eq!(coords.len(), 5);
            assert!((coords[1][2] - 172.5).abs() < 1e-9);
        }
        _ => panic!("Expected LineString"),
    }

    let props = f.properties.as_ref().unwrap();
    let times = props["coordinateProperties"]["times"].as_array().unwrap();
    assert_eq!(times[0], "2011-06-05T12:30:00Z");
    assert_eq!(times[4], "2011-06-05T12:41:00Z");
}
