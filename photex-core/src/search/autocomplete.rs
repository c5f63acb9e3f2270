//! Autocomplete suggestion extraction.
//!
//! Candidates come from the repository as distinct values matching the text;
//! a local case-insensitive refilter guards against backend collation
//! differences. Keyword rows arrive comma-joined and are split first.

use crate::database::ports::{CandidateField, SearchRepository};
use crate::error::Result;
use crate::model::{AutocompleteItem, PositionRow};
use crate::search::types::SearchKind;
use crate::settings::SearchSettings;

pub(crate) async fn collect(
    repository: &dyn SearchRepository,
    settings: &SearchSettings,
    text: &str,
    kind: SearchKind,
) -> Result<Vec<AutocompleteItem>> {
    let cap = settings.autocomplete_max_per_category;
    let pattern = format!("%{text}%");
    let needle = text.to_lowercase();
    let wants = |candidate: SearchKind| kind == SearchKind::AnyText || kind == candidate;
    let mut items = Vec::new();

    if wants(SearchKind::Keyword) {
        for joined in repository
            .distinct_values(CandidateField::Keywords, &pattern, cap)
            .await?
        {
            for token in joined.split(',') {
                push_matching(&mut items, token, &needle, SearchKind::Keyword);
            }
        }
    }

    if wants(SearchKind::Person) {
        for name in repository
            .distinct_values(CandidateField::PersonName, &pattern, cap)
            .await?
        {
            push_matching(&mut items, &name, &needle, SearchKind::Person);
        }
    }

    if wants(SearchKind::Position) || kind == SearchKind::Distance {
        // A distance hint wants the same place values, labeled as such.
        let label = if kind == SearchKind::Distance {
            SearchKind::Distance
        } else {
            SearchKind::Position
        };
        for row in repository.position_candidates(&pattern, cap).await? {
            let PositionRow {
                country,
                state,
                city,
            } = row;
            for value in [city, country, state].into_iter().flatten() {
                push_matching(&mut items, &value, &needle, label);
            }
        }
    }

    if wants(SearchKind::FileName) {
        for name in repository
            .distinct_values(CandidateField::MediaName, &pattern, cap)
            .await?
        {
            push_matching(&mut items, &name, &needle, SearchKind::FileName);
        }
    }

    if wants(SearchKind::Caption) {
        for caption in repository
            .distinct_values(CandidateField::Caption, &pattern, cap)
            .await?
        {
            push_matching(&mut items, &caption, &needle, SearchKind::Caption);
        }
    }

    if wants(SearchKind::Directory) {
        for name in repository
            .distinct_values(CandidateField::DirectoryName, &pattern, cap)
            .await?
        {
            push_matching(&mut items, &name, &needle, SearchKind::Directory);
        }
    }

    let unique = dedup_first_seen(items);
    tracing::debug!(text, suggestions = unique.len(), "autocomplete collected");
    Ok(unique)
}

fn push_matching(items: &mut Vec<AutocompleteItem>, value: &str, needle: &str, kind: SearchKind) {
    if value.to_lowercase().contains(needle) {
        items.push(AutocompleteItem::new(value, kind));
    }
}

/// Drop duplicates by (value, kind), keeping first occurrences in order.
/// Quadratic, bounded by the small per-category caps.
fn dedup_first_seen(items: Vec<AutocompleteItem>) -> Vec<AutocompleteItem> {
    let mut unique: Vec<AutocompleteItem> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::ports::MockSearchRepository;
    use mockall::predicate::{always, eq};

    #[tokio::test]
    async fn keywords_are_split_and_refiltered() {
        let mut repository = MockSearchRepository::new();
        repository
            .expect_distinct_values()
            .with(eq(CandidateField::Keywords), eq("%sea%"), always())
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![
                    "beach,sea,sand".to_string(),
                    "seagull,forest".to_string(),
                ])
            });

        let items = collect(
            &repository,
            &SearchSettings::default(),
            "sea",
            SearchKind::Keyword,
        )
        .await
        .unwrap();

        let values: Vec<_> = items.iter().map(|i| i.value.as_str()).collect();
        assert_eq!(values, vec!["sea", "seagull"]);
        assert!(items.iter().all(|i| i.kind == SearchKind::Keyword));
    }

    #[tokio::test]
    async fn duplicates_collapse_preserving_first_seen_order() {
        let mut repository = MockSearchRepository::new();
        repository
            .expect_distinct_values()
            .with(eq(CandidateField::Keywords), always(), always())
            .returning(|_, _, _| Ok(vec!["alps,alps".to_string(), "alps".to_string()]));
        repository
            .expect_distinct_values()
            .returning(|_, _, _| Ok(vec!["alpine.jpg".to_string()]));
        repository
            .expect_position_candidates()
            .returning(|_, _| Ok(vec![PositionRow::default()]));

        let items = collect(
            &repository,
            &SearchSettings::default(),
            "alp",
            SearchKind::AnyText,
        )
        .await
        .unwrap();

        let alps: Vec<_> = items.iter().filter(|i| i.value == "alps").collect();
        assert_eq!(alps.len(), 1);
        assert_eq!(items[0].value, "alps");
    }

    #[tokio::test]
    async fn distance_hint_labels_position_values() {
        let mut repository = MockSearchRepository::new();
        repository.expect_position_candidates().times(1).returning(|_, _| {
            Ok(vec![PositionRow {
                country: Some("Norway".to_string()),
                state: None,
                city: Some("Oslo".to_string()),
            }])
        });

        let items = collect(
            &repository,
            &SearchSettings::default(),
            "o",
            SearchKind::Distance,
        )
        .await
        .unwrap();

        // City comes before country within one row.
        let values: Vec<_> = items.iter().map(|i| i.value.as_str()).collect();
        assert_eq!(values, vec!["Oslo", "Norway"]);
        assert!(items.iter().all(|i| i.kind == SearchKind::Distance));
    }

    #[tokio::test]
    async fn backend_collation_mismatches_are_refiltered_locally() {
        let mut repository = MockSearchRepository::new();
        repository
            .expect_distinct_values()
            .with(eq(CandidateField::MediaName), always(), always())
            .times(1)
            .returning(|_, _, _| Ok(vec!["beach.jpg".to_string(), "dunes.jpg".to_string()]));

        let items = collect(
            &repository,
            &SearchSettings::default(),
            "BEACH",
            SearchKind::FileName,
        )
        .await
        .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].value, "beach.jpg");
    }

    #[tokio::test]
    async fn specific_kind_queries_only_its_category() {
        let mut repository = MockSearchRepository::new();
        repository
            .expect_distinct_values()
            .with(eq(CandidateField::DirectoryName), eq("%sum%"), always())
            .times(1)
            .returning(|_, _, _| Ok(vec!["summer".to_string()]));

        let items = collect(
            &repository,
            &SearchSettings::default(),
            "sum",
            SearchKind::Directory,
        )
        .await
        .unwrap();

        assert_eq!(items, vec![AutocompleteItem::new("summer", SearchKind::Directory)]);
    }
}
