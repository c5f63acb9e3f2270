//! Runtime settings consumed by the search service.
//!
//! The types live here so the core stays loadable without any configuration
//! backend; `photex-config` layers file and environment sources on top.

use serde::{Deserialize, Serialize};

use crate::sql::SqlDialect;

/// Result caps and listing toggles for search requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Media rows returned per search before the overflow flag trips.
    pub max_media_result: u32,
    /// Directory rows returned per search before the overflow flag trips.
    pub max_directory_result: u32,
    /// Autocomplete candidates fetched per category.
    pub autocomplete_max_per_category: u32,
    /// Also list sidecar files found next to matched media.
    pub list_metafiles: bool,
    /// Also list directories matching the directory projection of the query.
    pub list_directories: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_media_result: 10_000,
            max_directory_result: 200,
            autocomplete_max_per_category: 5,
            list_metafiles: true,
            list_directories: true,
        }
    }
}

/// Connection settings for the catalog database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub backend: SqlDialect,
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            backend: SqlDialect::Sqlite,
            url: "sqlite://photex.sqlite".to_string(),
        }
    }
}

/// Endpoint settings for the external geocoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderSettings {
    pub endpoint: String,
    pub user_agent: String,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: concat!("photex/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Top-level settings tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GallerySettings {
    pub database: DatabaseSettings,
    pub search: SearchSettings,
    pub geocoder: GeocoderSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_sections() {
        let settings: GallerySettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.search.max_media_result, 10_000);
        assert_eq!(settings.search.autocomplete_max_per_category, 5);
        assert_eq!(settings.database.backend, SqlDialect::Sqlite);
        assert!(settings.search.list_directories);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let settings: GallerySettings =
            serde_json::from_str(r#"{"search":{"max_media_result":50}}"#).unwrap();
        assert_eq!(settings.search.max_media_result, 50);
        assert_eq!(settings.search.max_directory_result, 200);
    }
}
