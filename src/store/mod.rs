pub mod loader;

pub use loader::TrackLoader;

use tracing::{error, info};

use crate::core::{Sample, Track};
use crate::input::{TrackResult, TrackSource};

/// Where the track came from and how loading went
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Loaded { source: String, samples: usize },
    Failed { source: String, error: String },
}

/// Holds the loaded track and answers positional queries.
///
/// Loading happens once; a failure is logged and leaves the track empty.
#[derive(Debug, Clone)]
pub struct TrackStore {
    track: Track,
    status: LoadStatus,
}

impl TrackStore {
    pub fn new() -> Self {
        Self {
            track: Track::default(),
            status: LoadStatus::Idle,
        }
    }

    /// Fetch once from `source`. Never fails: errors end up in `status()`.
    pub async fn load(source: &dyn TrackSource) -> Self {
        Self::from_result(&source.describe(), source.fetch().await)
    }

    pub fn from_result(source: &str, result: TrackResult<Track>) -> Self {
        match result {
            Ok(track) => {
                info!("Loaded {} samples from {}", track.len(), source);
                Self {
                    status: LoadStatus::Loaded {
                        source: source.to_string(),
                        samples: track.len(),
                    },
                    track,
                }
            }
            Err(e) => {
                error!("Failed to load track from {}: {}", source, e);
                Self {
                    track: Track::default(),
                    status: LoadStatus::Failed {
                        source: source.to_string(),
                        error: e.to_string(),
                    },
                }
            }
        }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn set_loading(&mut self) {
        self.status = LoadStatus::Loading;
    }

    pub fn len(&self) -> usize {
        self.track.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track.is_empty()
    }

    /// None if `i` is outside `[0, len)`
    pub fn at(&self, i: usize) -> Option<&Sample> {
        self.track.at(i)
    }
}

impl Default for TrackStore {
    fn default() -> Self {
        Self::new()
    }
}
