use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::GeoPoint;
use crate::playback::Speed;

pub const DEFAULT_SOURCE: &str = "http://localhost:8000/flight-data/";

/// Viewer configuration, read from `<config dir>/flight-replay/config.json`.
///
/// Read-only: nothing is ever written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// URL or file path of the track
    pub source: String,
    /// Restrict the flight-data service to one uploaded log
    pub file_name: Option<String>,
    /// 1, 2 or 3
    pub default_speed: u8,
    /// Web Mercator zoom level of the map
    pub zoom: f32,
    /// Keep the map centred on the aircraft
    pub follow_aircraft: bool,
    /// Map centre while no track is loaded, `[lat, lon]`
    pub default_center: [f64; 2],
    pub request_timeout_secs: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            file_name: None,
            default_speed: 1,
            zoom: 15.0,
            follow_aircraft: true,
            default_center: [50.3168118, -4.2199067],
            request_timeout_secs: 10,
        }
    }
}

impl ReplayConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("flight-replay").join("config.json"))
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Configured speed, 1x when the value is not one of 1, 2, 3
    pub fn speed(&self) -> Speed {
        Speed::try_from(self.default_speed).unwrap_or_else(|other| {
            warn!("Unsupported default_speed {}, using 1x", other);
            Speed::X1
        })
    }

    pub fn default_center(&self) -> GeoPoint {
        GeoPoint::from(self.default_center)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: ReplayConfig = serde_json::from_str(r#"{"default_speed": 3, "zoom": 17.5}"#).unwrap();
        assert_eq!(config.speed(), Speed::X3);
        assert_eq!(config.zoom, 17.5);
        assert_eq!(config.source, DEFAULT_SOURCE);
        assert!(config.follow_aircraft);
    }

    #[test]
    fn test_bad_speed_falls_back() {
        let config = ReplayConfig {
            default_speed: 7,
            ..ReplayConfig::default()
        };
        assert_eq!(config.speed(), Speed::X1);
    }

    #[test]
    fn test_load_from_invalid_json() {
        let path = std::env::temp_dir().join(format!("flight-replay-config-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = ReplayConfig::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_default_center() {
        let config = ReplayConfig::default();
        assert_eq!(config.default_center(), GeoPoint::new(50.3168118, -4.2199067));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }
}
