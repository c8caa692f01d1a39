//! Geovelo `routes_m2m` wire format.
//!
//! Request body:
//!
//! ```json
//! {"starts": [[lat, lon, "uri-or-null"], ...], "ends": [[lat, lon, null], ...]}
//! ```
//!
//! Response body is a table whose first row is the fixed header
//! `["start_reference", "end_reference", "duration"]`, followed by one row per
//! start/end pair in request order. A `null` duration means the pair could not
//! be routed.
//!
//! Everything here is pure; logging and failure accounting belong to the
//! connector.

use serde::Serialize;
use serde_json::Value;

use crate::street_network::{DirectPathRequest, StreetNetworkError};
use crate::{
    Itinerary, MatrixEntry, PathItem, Place, PlaceRef, RoutingMatrix, Section, StreetNetworkMode,
};

/// Header row every `routes_m2m` response starts with.
pub const MATRIX_HEADER: [&str; 3] = ["start_reference", "end_reference", "duration"];

/// Speed used to derive a length from a duration, the provider returns no geometry.
pub const ASSUMED_SPEED_METERS_PER_SECOND: i64 = 3;

const DURATION_COLUMN: usize = 2;

/// `[lat, lon, uri]` triple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WirePlace<'a>(pub f64, pub f64, pub Option<&'a str>);

impl<'a> WirePlace<'a> {
    pub fn from_place(place: &'a dyn PlaceRef) -> Self {
        let coord = place.coord();
        Self(coord.lat(), coord.lon(), place.uri())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutesRequest<'a> {
    pub starts: Vec<WirePlace<'a>>,
    pub ends: Vec<WirePlace<'a>>,
}

impl<'a> RoutesRequest<'a> {
    pub fn new(origins: &[&'a dyn PlaceRef], destinations: &[&'a dyn PlaceRef]) -> Self {
        Self {
            starts: origins.iter().map(|place| WirePlace::from_place(*place)).collect(),
            ends: destinations
                .iter()
                .map(|place| WirePlace::from_place(*place))
                .collect(),
        }
    }
}

/// Serializes the request body for a `routes_m2m` call.
pub fn encode_routes_request(
    origins: &[&dyn PlaceRef],
    destinations: &[&dyn PlaceRef],
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&RoutesRequest::new(origins, destinations))
}

/// Decodes a matrix response answering `expected_pairs` start/end pairs.
///
/// The result is a single row whose entries follow the response row order,
/// which is the request order.
pub fn decode_matrix(body: &str, expected_pairs: usize) -> Result<RoutingMatrix, StreetNetworkError> {
    let rows = parse_table(body)?;
    let data = data_rows(&rows)?;

    if data.len() != expected_pairs {
        return Err(StreetNetworkError::parse_error(format!(
            "Geovelo nb response != nb requested: expected {expected_pairs} rows, got {}",
            data.len()
        )));
    }

    let entries = data
        .iter()
        .map(|row| {
            Ok(match duration_cell(row)? {
                Some(duration) => MatrixEntry::reached(duration),
                None => MatrixEntry::unreached(),
            })
        })
        .collect::<Result<Vec<_>, StreetNetworkError>>()?;

    Ok(RoutingMatrix::single_row(entries))
}

/// Decodes the duration of a point-to-point response.
///
/// Exactly one data row is accepted; a `null` duration cannot produce an
/// itinerary and is rejected too.
pub fn decode_direct_path_duration(body: &str) -> Result<i64, StreetNetworkError> {
    let rows = parse_table(body)?;
    let data = data_rows(&rows)?;

    let [row] = data else {
        return Err(StreetNetworkError::parse_error(format!(
            "Geovelo nb response != nb requested: expected 1 row, got {}",
            data.len()
        )));
    };

    duration_cell(row)?.ok_or_else(|| {
        StreetNetworkError::parse_error("Geovelo parsing error: direct path has no duration")
    })
}

/// Builds the single-section itinerary for a direct path of `duration` seconds.
///
/// Clockwise requests depart at the requested time; counter-clockwise ones
/// arrive at it. The geometry is the two endpoints and the length assumes
/// [`ASSUMED_SPEED_METERS_PER_SECOND`].
pub fn build_itinerary(duration: i64, request: &DirectPathRequest<'_>) -> Itinerary {
    let (departure, arrival) = if request.clockwise {
        (request.datetime, request.datetime.plus_seconds(duration))
    } else {
        (request.datetime.minus_seconds(duration), request.datetime)
    };
    let length = duration.saturating_mul(ASSUMED_SPEED_METERS_PER_SECOND);

    let section = Section {
        id: String::from("section_0"),
        mode: request.mode,
        duration,
        length,
        begin_date_time: departure,
        end_date_time: arrival,
        origin: Place::from_ref(request.origin),
        destination: Place::from_ref(request.destination),
        coordinates: vec![request.origin.coord(), request.destination.coord()],
        path_items: vec![PathItem {
            name: String::from("unknown"),
            duration,
            length,
            direction: 0,
        }],
    };

    Itinerary {
        duration,
        departure_date_time: departure,
        arrival_date_time: arrival,
        sections: vec![section],
    }
}

/// Modes the `routes_m2m` endpoint can serve.
pub const fn supports_mode(mode: StreetNetworkMode) -> bool {
    matches!(mode, StreetNetworkMode::Bike)
}

fn parse_table(body: &str) -> Result<Vec<Vec<Value>>, StreetNetworkError> {
    serde_json::from_str(body).map_err(|error| {
        StreetNetworkError::parse_error(format!("Geovelo parsing error: {error}. Response: {body}"))
    })
}

fn data_rows(rows: &[Vec<Value>]) -> Result<&[Vec<Value>], StreetNetworkError> {
    match rows.split_first() {
        Some((header, data)) if is_header(header) => Ok(data),
        _ => Err(StreetNetworkError::parse_error(format!(
            "Geovelo parsing error: unexpected header. Response: {}",
            Value::from(rows.to_vec())
        ))),
    }
}

fn is_header(row: &[Value]) -> bool {
    row.len() == MATRIX_HEADER.len()
        && row
            .iter()
            .zip(MATRIX_HEADER)
            .all(|(cell, expected)| cell.as_str() == Some(expected))
}

fn duration_cell(row: &[Value]) -> Result<Option<i64>, StreetNetworkError> {
    if row.len() <= DURATION_COLUMN {
        return Err(StreetNetworkError::parse_error(format!(
            "Geovelo parsing error: row has {} elements, expected {}",
            row.len(),
            MATRIX_HEADER.len()
        )));
    }

    match &row[DURATION_COLUMN] {
        Value::Null => Ok(None),
        Value::Number(number) => match number.as_i64() {
            Some(seconds) if seconds >= 0 => Ok(Some(seconds)),
            Some(_) => Err(negative_duration(number)),
            None => match number.as_f64() {
                Some(seconds) if seconds >= 0.0 => Ok(Some(seconds.round() as i64)),
                _ => Err(negative_duration(number)),
            },
        },
        other => Err(StreetNetworkError::parse_error(format!(
            "Geovelo parsing error: duration must be a number or null, got {other}"
        ))),
    }
}

fn negative_duration(number: &serde_json::Number) -> StreetNetworkError {
    StreetNetworkError::parse_error(format!(
        "Geovelo parsing error: duration must not be negative, got {number}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::street_network::StreetNetworkErrorKind;
    use crate::{GeoPoint, RoutingStatus, UtcDateTime};

    fn place(lat: f64, lon: f64, uri: Option<&str>) -> Place {
        let coord = GeoPoint::new(lat, lon).expect("valid coordinate");
        match uri {
            Some(uri) => Place::with_uri(coord, uri),
            None => Place::new(coord),
        }
    }

    #[test]
    fn encodes_starts_and_ends_as_triples() {
        let origin = place(48.85, 2.35, Some("stop_area:a"));
        let destination = place(48.86, 2.36, None);

        let body = encode_routes_request(&[&origin], &[&destination]).expect("serializable");
        let value: Value = serde_json::from_str(&body).expect("valid json");

        assert_eq!(
            value,
            serde_json::json!({
                "starts": [[48.85, 2.35, "stop_area:a"]],
                "ends": [[48.86, 2.36, null]],
            })
        );
    }

    #[test]
    fn decodes_matrix_in_response_order() {
        let body = r#"[
            ["start_reference", "end_reference", "duration"],
            ["a", "x", 120],
            ["a", "y", null],
            ["a", "z", 30.6]
        ]"#;

        let matrix = decode_matrix(body, 3).expect("valid matrix");
        let entries: Vec<MatrixEntry> = matrix.entries().copied().collect();

        assert_eq!(matrix.rows.len(), 1);
        assert_eq!(
            entries,
            vec![
                MatrixEntry::reached(120),
                MatrixEntry::unreached(),
                MatrixEntry::reached(31),
            ]
        );
    }

    #[test]
    fn zero_duration_is_reached() {
        let body = r#"[["start_reference","end_reference","duration"],["a","a",0]]"#;

        let matrix = decode_matrix(body, 1).expect("valid matrix");
        let entry = matrix.entries().next().copied().expect("one entry");
        assert_eq!(entry.status, RoutingStatus::Reached);
        assert_eq!(entry.duration, 0);
    }

    #[test]
    fn wrong_header_is_a_parse_error() {
        let body = r#"[["start","end","duration"],["a","x",120]]"#;

        let error = decode_matrix(body, 1).expect_err("must fail");
        assert_eq!(error.kind(), StreetNetworkErrorKind::ParseError);
    }

    #[test]
    fn empty_table_is_a_parse_error() {
        let error = decode_matrix("[]", 0).expect_err("must fail");
        assert_eq!(error.kind(), StreetNetworkErrorKind::ParseError);
    }

    #[test]
    fn short_row_is_a_parse_error() {
        let body = r#"[["start_reference","end_reference","duration"],["a","x"]]"#;

        let error = decode_matrix(body, 1).expect_err("must fail");
        assert_eq!(error.kind(), StreetNetworkErrorKind::ParseError);
    }

    #[test]
    fn textual_duration_is_a_parse_error() {
        let body = r#"[["start_reference","end_reference","duration"],["a","x","soon"]]"#;

        let error = decode_matrix(body, 1).expect_err("must fail");
        assert_eq!(error.kind(), StreetNetworkErrorKind::ParseError);
    }

    #[test]
    fn non_table_body_is_a_parse_error() {
        let error = decode_matrix(r#"{"error":"maintenance"}"#, 1).expect_err("must fail");
        assert_eq!(error.kind(), StreetNetworkErrorKind::ParseError);
    }

    #[test]
    fn direct_path_needs_exactly_one_row() {
        let body = r#"[
            ["start_reference", "end_reference", "duration"],
            ["a", "b", 100],
            ["a", "b", 200]
        ]"#;

        let error = decode_direct_path_duration(body).expect_err("must fail");
        assert_eq!(error.kind(), StreetNetworkErrorKind::ParseError);
    }

    #[test]
    fn direct_path_without_duration_is_a_parse_error() {
        let body = r#"[["start_reference","end_reference","duration"],["a","b",null]]"#;

        let error = decode_direct_path_duration(body).expect_err("must fail");
        assert_eq!(error.kind(), StreetNetworkErrorKind::ParseError);
    }

    #[test]
    fn itinerary_carries_endpoint_geometry_and_assumed_length() {
        let origin = place(48.85, 2.35, Some("origin"));
        let destination = place(48.86, 2.36, None);
        let request = DirectPathRequest {
            mode: StreetNetworkMode::Bike,
            origin: &origin,
            destination: &destination,
            datetime: UtcDateTime::parse("2024-03-10T08:00:00Z").expect("valid"),
            clockwise: true,
        };

        let itinerary = build_itinerary(600, &request);
        let section = &itinerary.sections[0];

        assert_eq!(section.id, "section_0");
        assert_eq!(section.length, 1_800);
        assert_eq!(section.coordinates, vec![origin.coord, destination.coord]);
        assert_eq!(section.path_items.len(), 1);
        assert_eq!(section.path_items[0].name, "unknown");
        assert_eq!(section.path_items[0].length, 1_800);
        assert_eq!(section.origin.uri.as_deref(), Some("origin"));
        assert_eq!(section.begin_date_time, itinerary.departure_date_time);
        assert_eq!(section.end_date_time, itinerary.arrival_date_time);
    }
}
