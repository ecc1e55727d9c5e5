use crate::core::{Sample, Track};
use crate::input::{TrackError, TrackResult};

const LAT_NAMES: &[&str] = &["lat", "latitude"];
const LON_NAMES: &[&str] = &["lon", "lng", "long", "longitude"];
const ALT_NAMES: &[&str] = &["alt", "altitude"];
const HEADING_NAMES: &[&str] = &["heading", "hdg", "yaw"];

/// Decode track samples from CSV.
///
/// Columns are found by header name, in any order:
/// - lat / latitude
/// - lon / lng / longitude
/// - alt / altitude
/// - heading / hdg / yaw
pub fn parse_csv<R: std::io::Read>(reader: R) -> TrackResult<Track> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?;
    let columns = detect_columns(headers)?;

    let mut samples = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let row = row + 2;

        samples.push(Sample::new(
            field(&record, columns.lat, row, "lat")?,
            field(&record, columns.lon, row, "lon")?,
            field(&record, columns.alt, row, "alt")?,
            field(&record, columns.heading, row, "heading")?,
        ));
    }

    Ok(Track::new(samples))
}

struct Columns {
    lat: usize,
    lon: usize,
    alt: usize,
    heading: usize,
}

/// Detect column indices from CSV headers
fn detect_columns(headers: &csv::StringRecord) -> TrackResult<Columns> {
    Ok(Columns {
        lat: find_column(headers, LAT_NAMES)?,
        lon: find_column(headers, LON_NAMES)?,
        alt: find_column(headers, ALT_NAMES)?,
        heading: find_column(headers, HEADING_NAMES)?,
    })
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &'static [&'static str]) -> TrackResult<usize> {
    headers
        .iter()
        .position(|header| {
            let header_lower = header.to_lowercase();
            names.iter().any(|&name| header_lower == name)
        })
        .ok_or(TrackError::MissingColumn(names))
}

fn field(record: &csv::StringRecord, idx: usize, row: usize, column: &'static str) -> TrackResult<f64> {
    let raw = record.get(idx).unwrap_or_default();
    raw.parse::<f64>().map_err(|_| TrackError::InvalidValue {
        row,
        column,
        value: raw.to_string(),
    })
}
