//! Directory-scope projection of a query tree.

use crate::error::{GalleryError, Result};
use crate::search::normalize::NormalizedQuery;
use crate::search::types::SearchQuery;

/// Prune a normalized tree to the leaves meaningful for directory matching.
///
/// `And` keeps all children or nothing (a conjunction cannot drop a required
/// term); `Or` drops irrelevant children and survives while any remain.
/// `AnyText` and `Directory` leaves pass through; every other leaf is
/// irrelevant at directory granularity. `None` at the top means the query has
/// no directory-relevant constraint and callers must skip the directory
/// search entirely, not match everything.
pub fn directory_scope(query: &NormalizedQuery) -> Result<Option<NormalizedQuery>> {
    Ok(scope_node(query.as_query())?.map(NormalizedQuery::new_unchecked))
}

fn scope_node(query: &SearchQuery) -> Result<Option<SearchQuery>> {
    match query {
        SearchQuery::And { list } => {
            let mut kept = Vec::with_capacity(list.len());
            for child in list {
                match scope_node(child)? {
                    Some(child) => kept.push(child),
                    None => return Ok(None),
                }
            }
            Ok(Some(SearchQuery::And { list: kept }))
        }
        SearchQuery::Or { list } => {
            let mut kept = Vec::new();
            for child in list {
                if let Some(child) = scope_node(child)? {
                    kept.push(child);
                }
            }
            if kept.is_empty() {
                Ok(None)
            } else {
                Ok(Some(SearchQuery::Or { list: kept }))
            }
        }
        SearchQuery::SomeOf { .. } => Err(GalleryError::UnsupportedInScope(
            "some_of must be flattened before directory projection".to_string(),
        )),
        SearchQuery::AnyText(_) | SearchQuery::Directory(_) => Ok(Some(query.clone())),
        _ => Ok(None),
    }
}
