use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::core::Track;
use crate::input::{parse_track, HttpSource, TrackError, TrackResult};

/// Somewhere a track can be fetched from, once per session
#[async_trait]
pub trait TrackSource: Send + Sync {
    /// Human-readable description for logs and the status line
    fn describe(&self) -> String;

    /// Fetch and decode the whole track
    async fn fetch(&self) -> TrackResult<Track>;
}

/// A track file on the local filesystem, format auto-detected
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TrackSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> TrackResult<Track> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|source| TrackError::Io {
                path: self.path.clone(),
                source,
            })?;

        let track = parse_track(&data)?;
        info!("Read {} samples from {}", track.len(), self.path.display());
        Ok(track)
    }
}

/// A track already in memory, e.g. the bundled sample
pub struct StaticSource {
    name: String,
    track: Track,
}

impl StaticSource {
    pub fn new(name: &str, track: Track) -> Self {
        Self {
            name: name.to_string(),
            track,
        }
    }
}

#[async_trait]
impl TrackSource for StaticSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    async fn fetch(&self) -> TrackResult<Track> {
        Ok(self.track.clone())
    }
}

/// Where the user asked to load a track from
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSpec {
    Http(String),
    File(PathBuf),
}

impl SourceSpec {
    /// URLs with an http(s) scheme go over HTTP, anything else is a path
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceSpec::Http(s.to_string())
        } else {
            SourceSpec::File(PathBuf::from(s))
        }
    }

    /// Build the source. `file_name` filters the HTTP service by uploaded log.
    pub fn into_source(self, file_name: Option<&str>, timeout: Duration) -> TrackResult<Arc<dyn TrackSource>> {
        Ok(match self {
            SourceSpec::Http(url) => {
                let mut source = HttpSource::new(&url, timeout)?;
                if let Some(name) = file_name {
                    source = source.with_file_name(name);
                }
                Arc::new(source)
            }
            SourceSpec::File(path) => Arc::new(FileSource::new(path)),
        })
    }
}
