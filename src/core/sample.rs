use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use super::GeoPoint;

/// One recorded track point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Latitude in degrees
    pub lat: f64,

    /// Longitude in degrees
    pub lon: f64,

    /// Altitude in meters
    pub alt: f64,

    /// Heading in degrees, [0, 360)
    pub heading: f64,

    /// Log timestamp, when the source carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl Sample {
    pub fn new(lat: f64, lon: f64, alt: f64, heading: f64) -> Self {
        Self {
            lat,
            lon,
            alt,
            heading,
            recorded_at: None,
        }
    }

    /// Coordinate pair of this sample
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    /// Readout shown next to the scrub slider
    pub fn label(&self) -> String {
        format!("Alt: {:.1}m, Heading: {:.1}°", self.alt, self.heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_ignores_service_fields() {
        let json = r#"{"id": 7, "file_name": "a.tlog", "lat": 50.5, "lon": -4.25, "alt": 100, "heading": 173.3}"#;
        let sample: Sample = serde_json::from_str(json).unwrap();
        assert_eq!(sample, Sample::new(50.5, -4.25, 100.0, 173.3));
        assert!(sample.recorded_at.is_none());
    }

    #[test]
    fn test_label_rounds_to_one_decimal() {
        let sample = Sample::new(0.0, 0.0, 100.62, 173.29);
        assert_eq!(sample.label(), "Alt: 100.6m, Heading: 173.3°");
    }
}
