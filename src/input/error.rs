use std::path::PathBuf;
use thiserror::Error;

/// Result type for track loading
pub type TrackResult<T> = Result<T, TrackError>;

/// Everything that can go wrong while fetching or decoding a track
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid track JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid track CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not find column with names: {0:?}")]
    MissingColumn(&'static [&'static str]),

    #[error("row {row}: invalid {column} value {value:?}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("unknown track format")]
    UnknownFormat,
}
