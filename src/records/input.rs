use crate::clusterer::Point;
use crate::records::InputError;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Read every record of a JSON array file into points, keeping file order
pub fn read_points(path: &Path) -> Result<Vec<Point>, InputError> {
    let source = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| InputError::Io {
        path: source.clone(),
        source: e,
    })?;
    parse_points(&text, &source)
}

/// Parse `[{"lat": .., "lng": ..}, ..]`; `source` only labels errors
pub fn parse_points(text: &str, source: &str) -> Result<Vec<Point>, InputError> {
    let records: Vec<Map<String, Value>> =
        serde_json::from_str(text).map_err(|e| InputError::Parse {
            path: source.to_string(),
            source: e,
        })?;

    if records.is_empty() {
        return Err(InputError::Empty {
            path: source.to_string(),
        });
    }

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            Ok(Point::new(
                coordinate(record, "lat", index, source)?,
                coordinate(record, "lng", index, source)?,
            ))
        })
        .collect()
}

fn coordinate(
    record: &Map<String, Value>,
    field: &'static str,
    index: usize,
    source: &str,
) -> Result<f64, InputError> {
    let value = record.get(field).ok_or_else(|| InputError::MissingField {
        path: source.to_string(),
        index,
        field,
    })?;

    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::NotNumeric {
            path: source.to_string(),
            index,
            field,
        })
}
