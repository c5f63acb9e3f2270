use thiserror::Error;

use crate::geocode::GeocodeError;

/// Errors surfaced by the search core.
#[derive(Error, Debug)]
pub enum GalleryError {
    /// The query tree is structurally invalid (missing bound value, bad quantifier).
    #[error("malformed search query: {0}")]
    MalformedQuery(String),

    /// A node reached a compile stage that cannot handle it. Contract violation,
    /// not a user error.
    #[error("unsupported in this scope: {0}")]
    UnsupportedInScope(String),

    /// The geocoder could not resolve a place name referenced by the query.
    #[error("geo lookup failed for '{place}': {source}")]
    GeoLookup {
        place: String,
        #[source]
        source: GeocodeError,
    },

    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
