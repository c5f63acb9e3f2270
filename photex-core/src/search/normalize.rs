//! Query normalization: ID stamping and quantifier flattening.
//!
//! IDs are assigned before flattening, so leaves duplicated by combination
//! expansion share their ID and bound value. The ID counter is passed and
//! returned by value; normalization has no shared state.

use crate::error::{GalleryError, Result};
use crate::search::types::{QueryId, SearchQuery};

/// A query tree that went through [`normalize`]: every leaf carries an ID and
/// no `SomeOf` node remains. The compiler and the directory filter only accept
/// this witness type.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedQuery(SearchQuery);

impl NormalizedQuery {
    /// Wrap a tree that is already in normalized shape (IDs stamped, no
    /// quantifiers). Used by stages that transform a normalized tree without
    /// disturbing either property.
    pub(crate) fn new_unchecked(query: SearchQuery) -> Self {
        Self(query)
    }

    pub fn as_query(&self) -> &SearchQuery {
        &self.0
    }

    pub(crate) fn query_mut(&mut self) -> &mut SearchQuery {
        &mut self.0
    }

    pub fn into_inner(self) -> SearchQuery {
        self.0
    }
}

/// Normalize a raw query tree: stamp consecutive query IDs onto every leaf
/// (depth-first, starting at 1), then rewrite every `SomeOf` node into an
/// equivalent And/Or tree.
///
/// Stamping happens before flattening and skips leaves that already carry an
/// ID, so combination expansion may duplicate a leaf (the copies share name
/// and bound value) and re-normalizing an already-normalized tree reproduces
/// it structurally.
///
/// Fails with [`GalleryError::MalformedQuery`] when a `SomeOf` list is empty
/// or its `min` exceeds the list length.
pub fn normalize(query: SearchQuery) -> Result<NormalizedQuery> {
    let mut query = query;
    assign_query_ids(&mut query, 1);
    Ok(NormalizedQuery(flatten_some_of(query)?))
}

fn assign_query_ids(query: &mut SearchQuery, mut next: QueryId) -> QueryId {
    if let Some(list) = query.children_mut() {
        for child in list {
            next = assign_query_ids(child, next);
        }
        return next;
    }
    if query.query_id().is_none() {
        query.set_query_id(next);
        return next + 1;
    }
    next
}

fn flatten_some_of(query: SearchQuery) -> Result<SearchQuery> {
    match query {
        SearchQuery::And { list } => Ok(SearchQuery::And {
            list: flatten_list(list)?,
        }),
        SearchQuery::Or { list } => Ok(SearchQuery::Or {
            list: flatten_list(list)?,
        }),
        SearchQuery::SomeOf { list, min } => {
            let min = min.unwrap_or(1).max(1) as usize;
            if list.is_empty() {
                return Err(GalleryError::MalformedQuery(
                    "some_of requires a non-empty list".to_string(),
                ));
            }
            if min > list.len() {
                return Err(GalleryError::MalformedQuery(format!(
                    "some_of min {} exceeds its {} terms",
                    min,
                    list.len()
                )));
            }
            let list = flatten_list(list)?;
            if min == 1 {
                return Ok(SearchQuery::Or { list });
            }
            if min == list.len() {
                return Ok(SearchQuery::And { list });
            }
            let branches = combinations(&list, min)
                .into_iter()
                .map(|combo| SearchQuery::And { list: combo })
                .collect();
            Ok(SearchQuery::Or { list: branches })
        }
        leaf => Ok(leaf),
    }
}

fn flatten_list(list: Vec<SearchQuery>) -> Result<Vec<SearchQuery>> {
    list.into_iter().map(flatten_some_of).collect()
}

/// All `C(items.len(), take)` combinations in lexicographic index order,
/// preserving list order inside each combination. Exponential by nature;
/// quantified groups are small in practice.
fn combinations(items: &[SearchQuery], take: usize) -> Vec<Vec<SearchQuery>> {
    debug_assert!(take >= 1 && take <= items.len());
    let n = items.len();
    let mut picks: Vec<usize> = (0..take).collect();
    let mut out = Vec::new();
    loop {
        out.push(picks.iter().map(|&i| items[i].clone()).collect());
        // Rightmost position that can still advance.
        let mut pos = take;
        while pos > 0 && picks[pos - 1] == n - take + pos - 1 {
            pos -= 1;
        }
        if pos == 0 {
            return out;
        }
        picks[pos - 1] += 1;
        for i in pos..take {
            picks[i] = picks[i - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::types::RatingLeaf;

    /// Marker leaf: rating value doubles as the leaf index for evaluation.
    fn marker(index: i32) -> SearchQuery {
        SearchQuery::MinRating(RatingLeaf {
            value: Some(index),
            ..RatingLeaf::default()
        })
    }

    fn some_of(list: Vec<SearchQuery>, min: u32) -> SearchQuery {
        SearchQuery::SomeOf {
            list,
            min: Some(min),
        }
    }

    /// Evaluate a flattened tree against a truth assignment indexed by marker.
    fn eval(query: &SearchQuery, assignment: &[bool]) -> bool {
        match query {
            SearchQuery::And { list } => list.iter().all(|q| eval(q, assignment)),
            SearchQuery::Or { list } => list.iter().any(|q| eval(q, assignment)),
            SearchQuery::MinRating(leaf) => assignment[leaf.value.unwrap() as usize],
            other => panic!("unexpected node in flattened tree: {other:?}"),
        }
    }

    fn leaf_ids(query: &SearchQuery, out: &mut Vec<QueryId>) {
        match query.children() {
            Some(list) => list.iter().for_each(|q| leaf_ids(q, out)),
            None => out.push(query.query_id().expect("leaf without id")),
        }
    }

    #[test]
    fn some_of_matches_threshold_semantics_exhaustively() {
        let n = 4;
        for min in 1..=n {
            let query = some_of((0..n as i32).map(marker).collect(), min as u32);
            let flattened = normalize(query).unwrap().into_inner();
            for bits in 0..(1u32 << n) {
                let assignment: Vec<bool> = (0..n).map(|i| bits & (1 << i) != 0).collect();
                let expected = assignment.iter().filter(|&&b| b).count() >= min;
                assert_eq!(
                    eval(&flattened, &assignment),
                    expected,
                    "n={n} min={min} bits={bits:04b}"
                );
            }
        }
    }

    #[test]
    fn min_two_of_four_has_six_branches() {
        let query = some_of((0..4).map(marker).collect(), 2);
        let flattened = normalize(query).unwrap().into_inner();
        let SearchQuery::Or { list } = &flattened else {
            panic!("expected or of combinations");
        };
        assert_eq!(list.len(), 6);
        for branch in list {
            let SearchQuery::And { list } = branch else {
                panic!("expected and branch");
            };
            assert_eq!(list.len(), 2);
        }
    }

    #[test]
    fn min_one_becomes_or_and_full_min_becomes_and() {
        let by_min_one = normalize(some_of(vec![marker(0), marker(1)], 1))
            .unwrap()
            .into_inner();
        assert!(matches!(by_min_one, SearchQuery::Or { .. }));

        let by_full = normalize(some_of(vec![marker(0), marker(1)], 2))
            .unwrap()
            .into_inner();
        assert!(matches!(by_full, SearchQuery::And { .. }));
    }

    #[test]
    fn unset_min_defaults_to_one() {
        let query = SearchQuery::SomeOf {
            list: vec![marker(0), marker(1)],
            min: None,
        };
        let flattened = normalize(query).unwrap().into_inner();
        assert!(matches!(flattened, SearchQuery::Or { .. }));
    }

    #[test]
    fn invalid_min_is_rejected() {
        let over = some_of(vec![marker(0), marker(1)], 3);
        assert!(matches!(
            normalize(over),
            Err(GalleryError::MalformedQuery(_))
        ));

        let empty = SearchQuery::SomeOf {
            list: vec![],
            min: Some(1),
        };
        assert!(matches!(
            normalize(empty),
            Err(GalleryError::MalformedQuery(_))
        ));
    }

    #[test]
    fn nested_some_of_is_flattened_away() {
        let inner = some_of(vec![marker(0), marker(1), marker(2)], 2);
        let outer = some_of(vec![inner, marker(3)], 2);
        let flattened = normalize(outer).unwrap().into_inner();

        fn assert_no_some_of(query: &SearchQuery) {
            assert!(!matches!(query, SearchQuery::SomeOf { .. }));
            if let Some(list) = query.children() {
                list.iter().for_each(assert_no_some_of);
            }
        }
        assert_no_some_of(&flattened);
    }

    #[test]
    fn normalization_is_idempotent() {
        let query = SearchQuery::And {
            list: vec![
                some_of((0..4).map(marker).collect(), 2),
                SearchQuery::Or {
                    list: vec![marker(4), marker(5)],
                },
            ],
        };
        let once = normalize(query).unwrap();
        let twice = normalize(once.as_query().clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn quantifier_free_tree_gets_unique_consecutive_ids() {
        let query = SearchQuery::And {
            list: vec![
                marker(0),
                SearchQuery::Or {
                    list: vec![marker(1), marker(2)],
                },
                marker(3),
            ],
        };
        let normalized = normalize(query).unwrap();
        let mut ids = Vec::new();
        leaf_ids(normalized.as_query(), &mut ids);
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn expanded_duplicates_share_their_leaf_id() {
        let query = some_of((0..3).map(marker).collect(), 2);
        let normalized = normalize(query).unwrap();
        let mut ids = Vec::new();
        leaf_ids(normalized.as_query(), &mut ids);
        // Three distinct leaves, each appearing in two of the three branches.
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
