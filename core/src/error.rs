use std::path::PathBuf;

use thiserror::Error;

use crate::coords::RegionId;

/// Errors surfaced by the marker store.
///
/// Missing data is never an error; only data that exists and cannot be read
/// or written is.
#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("malformed marker data for region {region_id}")]
    MalformedRegion {
        region_id: RegionId,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize markers for region {region_id}")]
    Serialize {
        region_id: RegionId,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed config store {path:?}")]
    MalformedStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = MarkerError> = std::result::Result<T, E>;
