use std::path::PathBuf;

/// Errors raised by the catalog, classifier and guidance lookup
#[derive(thiserror::Error, Debug)]
pub enum ZoneError {
    #[error("bomb not found in catalog: {0}")]
    NotFound(String),
    #[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
    InvalidCoordinate {
        latitude: f64,
        longitude: f64,
        reason: &'static str,
    },
    #[error("no guidance for zone: {0}")]
    UnknownZone(String),
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error("malformed JSON: {0}")]
    Json(#[from] simd_json::Error),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ZoneError>;
