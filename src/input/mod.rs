pub mod csv;
pub mod error;
pub mod http;
pub mod json;
pub mod source;
pub mod tlog;

pub use error::{TrackError, TrackResult};
pub use http::HttpSource;
pub use source::{FileSource, SourceSpec, StaticSource, TrackSource};

use crate::core::Track;

/// The 28-sample flight shipped with the viewer
pub const BUNDLED_SAMPLE: &[u8] = include_bytes!("../../assets/sample_track.json");

/// Input format detection result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    Json,
    Tlog,
    Csv,
    Unknown,
}

/// Detect the format of track data by looking at its first bytes
pub fn detect_format(data: &[u8]) -> InputFormat {
    if is_json_array(data) {
        return InputFormat::Json;
    }

    if tlog::looks_like_tlog(data) {
        return InputFormat::Tlog;
    }

    if is_csv(data) {
        return InputFormat::Csv;
    }

    InputFormat::Unknown
}

fn is_json_array(data: &[u8]) -> bool {
    data.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'[')
}

fn is_csv(data: &[u8]) -> bool {
    if data.len() < 10 {
        return false;
    }

    // Look for a line with commas in the first 500 bytes
    match std::str::from_utf8(&data[..data.len().min(500)]) {
        Ok(text) => text
            .lines()
            .take(5)
            .any(|line| line.chars().filter(|&c| c == ',').count() >= 2),
        // The sample window may cut a multi-byte character in half
        Err(e) if e.valid_up_to() > 0 && e.error_len().is_none() => {
            is_csv(&data[..e.valid_up_to()])
        }
        Err(_) => false,
    }
}

/// Decode track data, auto-detecting the format
pub fn parse_track(data: &[u8]) -> TrackResult<Track> {
    match detect_format(data) {
        InputFormat::Json => json::parse_json(data),
        InputFormat::Tlog => Ok(tlog::parse_tlog(data)),
        InputFormat::Csv => csv::parse_csv(data),
        InputFormat::Unknown => Err(TrackError::UnknownFormat),
    }
}

/// The bundled sample track
pub fn bundled_sample() -> TrackResult<Track> {
    json::parse_json(BUNDLED_SAMPLE)
}
