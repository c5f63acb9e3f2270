//! Predicate compilation: walks a normalized tree and emits the abstract
//! predicate for one backend dialect.
//!
//! Negation is structural, not cosmetic: it flips each leaf's comparison
//! operator and the polarity used to join multi-part leaf conditions, so a
//! negated fan-out demands that no part matches (De Morgan).

use crate::error::{GalleryError, Result};
use crate::search::geo::BoundingBox;
use crate::search::normalize::NormalizedQuery;
use crate::search::predicate::{Bind, CompareOp, Field, Predicate};
use crate::search::types::{
    DateLeaf, DistanceLeaf, OrientationLeaf, QueryId, RatingLeaf, ResolutionLeaf, SearchKind,
    SearchQuery, TextLeaf, TextMatch,
};
use crate::sql::SqlDialect;

/// Compile a normalized query into an executable predicate.
///
/// With `directory_only` set, only directory-relevant leaves may appear;
/// callers project the tree through the directory filter first. Pure and
/// synchronous; distance leaves must already carry coordinates.
pub fn compile(
    query: &NormalizedQuery,
    dialect: SqlDialect,
    directory_only: bool,
) -> Result<Predicate> {
    compile_node(query.as_query(), dialect, directory_only)
}

fn compile_node(
    query: &SearchQuery,
    dialect: SqlDialect,
    directory_only: bool,
) -> Result<Predicate> {
    match query {
        SearchQuery::And { list } => Ok(Predicate::All(
            list.iter()
                .map(|child| compile_node(child, dialect, directory_only))
                .collect::<Result<_>>()?,
        )),
        SearchQuery::Or { list } => Ok(Predicate::Any(
            list.iter()
                .map(|child| compile_node(child, dialect, directory_only))
                .collect::<Result<_>>()?,
        )),
        SearchQuery::SomeOf { .. } => Err(GalleryError::UnsupportedInScope(
            "some_of must be flattened before compilation".to_string(),
        )),

        SearchQuery::Distance(leaf) => compile_distance(leaf, directory_only),
        SearchQuery::FromDate(leaf) => {
            compile_date(leaf, "from", CompareOp::Ge, CompareOp::Lt, directory_only)
        }
        SearchQuery::ToDate(leaf) => {
            compile_date(leaf, "to", CompareOp::Le, CompareOp::Gt, directory_only)
        }
        SearchQuery::MinRating(leaf) => {
            compile_rating(leaf, "min", CompareOp::Ge, CompareOp::Lt, directory_only)
        }
        SearchQuery::MaxRating(leaf) => {
            compile_rating(leaf, "max", CompareOp::Le, CompareOp::Gt, directory_only)
        }
        SearchQuery::MinResolution(leaf) => {
            compile_resolution(leaf, "min", CompareOp::Ge, CompareOp::Lt, directory_only)
        }
        SearchQuery::MaxResolution(leaf) => {
            compile_resolution(leaf, "max", CompareOp::Le, CompareOp::Gt, directory_only)
        }
        SearchQuery::Orientation(leaf) => compile_orientation(leaf, directory_only),

        SearchQuery::AnyText(leaf) => {
            compile_text(SearchKind::AnyText, leaf, dialect, directory_only)
        }
        SearchQuery::Keyword(leaf) => {
            compile_text(SearchKind::Keyword, leaf, dialect, directory_only)
        }
        SearchQuery::Caption(leaf) => {
            compile_text(SearchKind::Caption, leaf, dialect, directory_only)
        }
        SearchQuery::FileName(leaf) => {
            compile_text(SearchKind::FileName, leaf, dialect, directory_only)
        }
        SearchQuery::Person(leaf) => {
            compile_text(SearchKind::Person, leaf, dialect, directory_only)
        }
        SearchQuery::Directory(leaf) => {
            compile_text(SearchKind::Directory, leaf, dialect, directory_only)
        }
        SearchQuery::Position(leaf) => {
            compile_text(SearchKind::Position, leaf, dialect, directory_only)
        }
    }
}

fn media_scope(what: &str, directory_only: bool) -> Result<()> {
    if directory_only {
        return Err(GalleryError::UnsupportedInScope(format!(
            "{what} is not available in directory-only scope"
        )));
    }
    Ok(())
}

fn bound_id(id: Option<QueryId>) -> Result<QueryId> {
    id.ok_or_else(|| {
        GalleryError::Internal("query leaf has no id; the tree was not normalized".to_string())
    })
}

fn compile_distance(leaf: &DistanceLeaf, directory_only: bool) -> Result<Predicate> {
    media_scope("distance", directory_only)?;
    let origin = leaf.from.gps.ok_or_else(|| {
        GalleryError::MalformedQuery(
            "distance query has unresolved coordinates; place resolution must run first"
                .to_string(),
        )
    })?;
    let id = bound_id(leaf.query_id)?;
    let bbox = BoundingBox::around(origin, leaf.distance_km);

    let compare = |field, op, prefix, value| Predicate::Compare {
        field,
        op,
        bind: Bind::float(prefix, id, value),
    };
    if leaf.negate {
        // Complement of the box: outside any of the four bounds.
        Ok(Predicate::Any(vec![
            compare(Field::Latitude, CompareOp::Gt, "max_lat", bbox.max_lat),
            compare(Field::Latitude, CompareOp::Lt, "min_lat", bbox.min_lat),
            compare(Field::Longitude, CompareOp::Gt, "max_lon", bbox.max_lon),
            compare(Field::Longitude, CompareOp::Lt, "min_lon", bbox.min_lon),
        ]))
    } else {
        Ok(Predicate::All(vec![
            compare(Field::Latitude, CompareOp::Lt, "max_lat", bbox.max_lat),
            compare(Field::Latitude, CompareOp::Gt, "min_lat", bbox.min_lat),
            compare(Field::Longitude, CompareOp::Lt, "max_lon", bbox.max_lon),
            compare(Field::Longitude, CompareOp::Gt, "min_lon", bbox.min_lon),
        ]))
    }
}

fn compile_date(
    leaf: &DateLeaf,
    prefix: &str,
    op: CompareOp,
    negated_op: CompareOp,
    directory_only: bool,
) -> Result<Predicate> {
    media_scope("date", directory_only)?;
    let value = leaf.value.ok_or_else(|| {
        GalleryError::MalformedQuery("date query requires a bound value".to_string())
    })?;
    Ok(Predicate::Compare {
        field: Field::CreationDate,
        op: if leaf.negate { negated_op } else { op },
        bind: Bind::int(prefix, bound_id(leaf.query_id)?, value.timestamp_millis()),
    })
}

fn compile_rating(
    leaf: &RatingLeaf,
    prefix: &str,
    op: CompareOp,
    negated_op: CompareOp,
    directory_only: bool,
) -> Result<Predicate> {
    media_scope("rating", directory_only)?;
    let value = leaf.value.ok_or_else(|| {
        GalleryError::MalformedQuery("rating query requires a bound value".to_string())
    })?;
    Ok(Predicate::Compare {
        field: Field::Rating,
        op: if leaf.negate { negated_op } else { op },
        bind: Bind::int(prefix, bound_id(leaf.query_id)?, i64::from(value)),
    })
}

fn compile_resolution(
    leaf: &ResolutionLeaf,
    prefix: &str,
    op: CompareOp,
    negated_op: CompareOp,
    directory_only: bool,
) -> Result<Predicate> {
    media_scope("resolution", directory_only)?;
    let value = leaf.value.ok_or_else(|| {
        GalleryError::MalformedQuery("resolution query requires a bound value".to_string())
    })?;
    Ok(Predicate::Compare {
        field: Field::Resolution,
        op: if leaf.negate { negated_op } else { op },
        // Megapixels to pixels, compared against width * height.
        bind: Bind::float(prefix, bound_id(leaf.query_id)?, value * 1_000_000.0),
    })
}

fn compile_orientation(leaf: &OrientationLeaf, directory_only: bool) -> Result<Predicate> {
    media_scope("orientation", directory_only)?;
    Ok(Predicate::CompareFields {
        left: Field::Width,
        op: if leaf.landscape {
            CompareOp::Ge
        } else {
            CompareOp::Le
        },
        right: Field::Height,
    })
}

fn compile_text(
    kind: SearchKind,
    leaf: &TextLeaf,
    dialect: SqlDialect,
    directory_only: bool,
) -> Result<Predicate> {
    if directory_only && !matches!(kind, SearchKind::AnyText | SearchKind::Directory) {
        return Err(GalleryError::UnsupportedInScope(format!(
            "{kind:?} text query is not available in directory-only scope"
        )));
    }
    let id = bound_id(leaf.query_id)?;
    let negated = leaf.negate;
    // Raw text for exact match; wildcard-wrapped (and dialect-escaped) for substring.
    let match_pattern = |raw: &str| match leaf.match_type {
        TextMatch::Exact => raw.to_string(),
        TextMatch::Substring => format!("%{}%", dialect.escape_like(raw)),
    };
    let like = |field, bind: Bind| Predicate::Like {
        field,
        pattern: bind,
        negated,
    };

    let mut parts = Vec::new();

    if matches!(kind, SearchKind::AnyText | SearchKind::Directory) {
        let dir_path = leaf.text.replace('\\', "/");
        parts.push(like(
            Field::DirectoryPath,
            Bind::text("full_path", id, match_pattern(&dir_path)),
        ));

        let (parent, name) = split_dir_path(&dir_path);
        let mut dir_parts = vec![like(
            Field::DirectoryName,
            Bind::text("dir_name", id, match_pattern(name)),
        )];
        if dir_path.contains('/') {
            dir_parts.push(like(
                Field::DirectoryPath,
                Bind::text("parent_path", id, match_pattern(parent)),
            ));
        }
        parts.push(Predicate::joined_rev(negated, dir_parts));
    }

    let any_media = kind == SearchKind::AnyText && !directory_only;
    let text_bind = || Bind::text("text", id, match_pattern(&leaf.text));

    if any_media || kind == SearchKind::FileName {
        parts.push(like(Field::MediaName, text_bind()));
    }
    if any_media || kind == SearchKind::Caption {
        parts.push(like(Field::Caption, text_bind()));
    }
    if any_media || kind == SearchKind::Position {
        parts.push(like(Field::PositionCountry, text_bind()));
        parts.push(like(Field::PositionState, text_bind()));
        parts.push(like(Field::PositionCity, text_bind()));
    }
    if any_media || kind == SearchKind::Person {
        parts.push(array_condition(Field::Persons, leaf, id, dialect));
    }
    if any_media || kind == SearchKind::Keyword {
        parts.push(array_condition(Field::Keywords, leaf, id, dialect));
    }

    Ok(Predicate::joined(negated, parts))
}

/// Match against a comma-joined array column.
///
/// Substring match degrades to a plain LIKE over the joined text. Exact match
/// requires a bounded element: first (`t,%`), middle (`%,t,%`), last (`%,t`)
/// or the whole value. Under negation a NULL column trivially satisfies "does
/// not contain", so it is OR'd in.
fn array_condition(field: Field, leaf: &TextLeaf, id: QueryId, dialect: SqlDialect) -> Predicate {
    let negated = leaf.negate;
    let like = |bind: Bind| Predicate::Like {
        field,
        pattern: bind,
        negated,
    };
    let matched = match leaf.match_type {
        TextMatch::Substring => like(Bind::text(
            "text",
            id,
            format!("%{}%", dialect.escape_like(&leaf.text)),
        )),
        TextMatch::Exact => {
            let text = &leaf.text;
            Predicate::joined(
                negated,
                vec![
                    like(Bind::text("elem_mid", id, format!("%,{text},%"))),
                    like(Bind::text("elem_last", id, format!("%,{text}"))),
                    like(Bind::text("elem_first", id, format!("{text},%"))),
                    like(Bind::text("elem_whole", id, text.clone())),
                ],
            )
        }
    };
    if negated {
        Predicate::Any(vec![matched, Predicate::IsNull(field)])
    } else {
        matched
    }
}

/// Split a normalized (forward-slash) directory path into parent and name.
/// Trailing separators are ignored; a path without separators has an empty
/// parent.
fn split_dir_path(path: &str) -> (&str, &str) {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(at) => (&trimmed[..at], &trimmed[at + 1..]),
        None => ("", trimmed),
    }
}
