use crate::core::{Sample, Track};
use crate::input::TrackResult;

/// Decode a JSON array of `{lat, lon, alt, heading}` records.
///
/// Extra fields such as `id` or `file_name` are ignored.
pub fn parse_json(data: &[u8]) -> TrackResult<Track> {
    let samples: Vec<Sample> = serde_json::from_slice(data)?;
    Ok(Track::new(samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TrackError;

    #[test]
    fn test_service_response() {
        let body = br#"[
            {"id": 1, "file_name": "f.tlog", "lat": 50.3168118, "lon": -4.2199067, "alt": 100.62, "heading": 173.3},
            {"id": 2, "file_name": "f.tlog", "lat": 50.3168118, "lon": -4.2199066, "alt": 100.65, "heading": 173.29}
        ]"#;
        let track = parse_json(body).unwrap();
        assert_eq!(track.len(), 2);
        assert_eq!(track.at(1).unwrap().lon, -4.2199066);
    }

    #[test]
    fn test_recorded_at() {
        let body = br#"[{"lat": 1, "lon": 2, "alt": 3, "heading": 4, "recorded_at": "2024-05-01T12:00:00Z"}]"#;
        let track = parse_json(body).unwrap();
        let ts = track.at(0).unwrap().recorded_at.unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T12:00:00+00:00");
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let body = br#"[{"lat": 1, "lon": 2, "alt": 3}]"#;
        assert!(matches!(parse_json(body), Err(TrackError::Json(_))));
    }

    #[test]
    fn test_non_numeric_field_is_an_error() {
        let body = br#"[{"lat": "north", "lon": 2, "alt": 3, "heading": 4}]"#;
        assert!(parse_json(body).is_err());
    }
}
