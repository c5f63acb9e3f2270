//! Search orchestration: prepare, compile, execute, cap.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::database::ports::SearchRepository;
use crate::error::Result;
use crate::geocode::Geocoder;
use crate::model::{AutocompleteItem, DirectoryRow, MediaRow, MetaFileRow};
use crate::search::autocomplete;
use crate::search::compile::compile;
use crate::search::directory::directory_scope;
use crate::search::geo::resolve_places;
use crate::search::normalize::{normalize, NormalizedQuery};
use crate::search::types::{SearchKind, SearchQuery};
use crate::settings::SearchSettings;

/// Everything a search request returns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    pub media: Vec<MediaRow>,
    pub meta_files: Vec<MetaFileRow>,
    pub directories: Vec<DirectoryRow>,
    /// Set when any category exceeded its configured cap.
    pub result_overflow: bool,
}

/// Front door of the search core. Owns the storage and geocoder contracts
/// and runs the normalize → resolve → compile → execute pipeline per request.
#[derive(Clone)]
pub struct SearchService {
    repository: Arc<dyn SearchRepository>,
    geocoder: Arc<dyn Geocoder>,
    settings: SearchSettings,
}

impl fmt::Debug for SearchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SearchService {
    pub fn new(
        repository: Arc<dyn SearchRepository>,
        geocoder: Arc<dyn Geocoder>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            repository,
            geocoder,
            settings,
        }
    }

    /// Normalize the tree and resolve distance-leaf coordinates.
    async fn prepare(&self, query: SearchQuery) -> Result<NormalizedQuery> {
        let mut normalized = normalize(query)?;
        resolve_places(&mut normalized, self.geocoder.as_ref()).await?;
        Ok(normalized)
    }

    /// Run a full search: media, plus sidecar files and directories when
    /// enabled. Each capped category requests one row beyond its cap; seeing
    /// it trips `result_overflow` and the row is dropped.
    pub async fn search(&self, query: SearchQuery) -> Result<SearchResult> {
        let prepared = self.prepare(query).await?;
        let dialect = self.repository.dialect();
        let predicate = compile(&prepared, dialect, false)?;

        let media_cap = self.settings.max_media_result;
        let mut media = self
            .repository
            .media_matching(&predicate, media_cap + 1)
            .await?;
        let mut result_overflow = false;
        if media.len() as u64 > u64::from(media_cap) {
            result_overflow = true;
            media.truncate(media_cap as usize);
        }

        let meta_files = if self.settings.list_metafiles {
            self.repository.meta_files_matching(&predicate).await?
        } else {
            Vec::new()
        };

        let mut directories = Vec::new();
        if self.settings.list_directories {
            if let Some(dir_query) = directory_scope(&prepared)? {
                let dir_predicate = compile(&dir_query, dialect, true)?;
                let dir_cap = self.settings.max_directory_result;
                directories = self
                    .repository
                    .directories_matching(&dir_predicate, dir_cap + 1)
                    .await?;
                if directories.len() as u64 > u64::from(dir_cap) {
                    result_overflow = true;
                    directories.truncate(dir_cap as usize);
                }
            }
        }

        tracing::debug!(
            media = media.len(),
            meta_files = meta_files.len(),
            directories = directories.len(),
            result_overflow,
            "search finished"
        );
        Ok(SearchResult {
            media,
            meta_files,
            directories,
            result_overflow,
        })
    }

    /// Number of media rows the query matches.
    pub async fn count(&self, query: SearchQuery) -> Result<u64> {
        let prepared = self.prepare(query).await?;
        let predicate = compile(&prepared, self.repository.dialect(), false)?;
        self.repository.count_matching(&predicate).await
    }

    /// One matching media row chosen at random, if any.
    pub async fn random_media(&self, query: SearchQuery) -> Result<Option<MediaRow>> {
        let prepared = self.prepare(query).await?;
        let predicate = compile(&prepared, self.repository.dialect(), false)?;
        self.repository.random_matching(&predicate).await
    }

    /// Autocomplete suggestions for free text, optionally narrowed to one
    /// leaf kind via `kind` (pass [`SearchKind::AnyText`] for all categories).
    pub async fn autocomplete(
        &self,
        text: &str,
        kind: SearchKind,
    ) -> Result<Vec<AutocompleteItem>> {
        autocomplete::collect(self.repository.as_ref(), &self.settings, text, kind).await
    }
}
