//! Row types crossing the storage boundary.
//!
//! # Schema Reference
//!
//! The repository contract assumes the following catalog layout:
//!
//! - `media` (`id`, `directory_id`, `name`, `caption`, `keywords`, `persons`,
//!   `country`, `state`, `city`, `latitude`, `longitude`, `creation_date`,
//!   `rating`, `width`, `height`). `keywords` and `persons` are comma-joined
//!   text columns; `creation_date` is epoch milliseconds (UTC).
//! - `directory` (`id`, `name`, `path`) referenced by `media.directory_id`.
//! - `meta_file` (`id`, `directory_id`, `name`) for sidecar files (gpx, pg2conf).
//! - `person` (`id`, `name`) backing person-name autocomplete.
//!
//! The comma-joined encoding cannot represent element values that themselves
//! contain commas; bounded-element matching is unsound for such values. This is
//! a pre-existing catalog assumption, kept as-is.

use serde::{Deserialize, Serialize};

use crate::search::types::SearchKind;

/// One catalog media item (photo or video) with its searchable metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct MediaRow {
    pub id: i64,
    pub directory_id: i64,
    pub name: String,
    pub caption: Option<String>,
    pub keywords: Option<String>,
    pub persons: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Epoch milliseconds, UTC.
    pub creation_date: i64,
    pub rating: Option<i64>,
    pub width: i64,
    pub height: i64,
}

/// One gallery directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct DirectoryRow {
    pub id: i64,
    pub name: String,
    pub path: String,
}

/// A non-media sidecar file living next to matched media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct MetaFileRow {
    pub id: i64,
    pub directory_id: i64,
    pub name: String,
}

/// A (country, state, city) candidate triplet for position autocomplete.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct PositionRow {
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

/// One autocomplete suggestion: a candidate value and the leaf kind it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteItem {
    pub value: String,
    pub kind: SearchKind,
}

impl AutocompleteItem {
    pub fn new(value: impl Into<String>, kind: SearchKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }
}
