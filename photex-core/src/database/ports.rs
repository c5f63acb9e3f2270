//! The narrow storage contract the search service consumes.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{DirectoryRow, MediaRow, MetaFileRow, PositionRow};
use crate::search::predicate::Predicate;
use crate::sql::SqlDialect;

/// Single-column candidate sources for autocomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateField {
    /// Comma-joined keyword lists (split by the caller).
    Keywords,
    /// Names from the person registry.
    PersonName,
    MediaName,
    Caption,
    DirectoryName,
}

/// Executes compiled predicates against the catalog.
///
/// The service never sees SQL; it hands a [`Predicate`] tree to the
/// repository, which renders it for its own dialect and binds parameters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchRepository: Send + Sync {
    /// Dialect the compiler must target for this backend.
    fn dialect(&self) -> SqlDialect;

    /// Media rows matching the predicate, capped at `limit`.
    async fn media_matching(&self, predicate: &Predicate, limit: u32) -> Result<Vec<MediaRow>>;

    /// Sidecar files living in the distinct directories of matching media.
    async fn meta_files_matching(&self, predicate: &Predicate) -> Result<Vec<MetaFileRow>>;

    /// Directory rows matching a directory-scoped predicate, capped at `limit`.
    async fn directories_matching(
        &self,
        predicate: &Predicate,
        limit: u32,
    ) -> Result<Vec<DirectoryRow>>;

    /// Number of media rows matching the predicate.
    async fn count_matching(&self, predicate: &Predicate) -> Result<u64>;

    /// One matching media row chosen at random.
    async fn random_matching(&self, predicate: &Predicate) -> Result<Option<MediaRow>>;

    /// Distinct candidate values whose column matches `pattern`
    /// (case-insensitive), capped at `limit`.
    async fn distinct_values(
        &self,
        field: CandidateField,
        pattern: &str,
        limit: u32,
    ) -> Result<Vec<String>>;

    /// Distinct (country, state, city) triplets where any component matches
    /// `pattern`, capped at `limit`.
    async fn position_candidates(&self, pattern: &str, limit: u32) -> Result<Vec<PositionRow>>;
}
