//! The search query model.
//!
//! A query is a tree: `And`/`Or`/`SomeOf` combinators over leaf conditions.
//! The tree is a closed tagged union so every consumer matches exhaustively;
//! adding a leaf kind fails to build until each stage handles it. The serde
//! shape (`type` tag, snake_case) is the JSON wire format accepted from
//! clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-leaf identifier stamped by normalization, used to namespace bound
/// parameters downstream.
pub type QueryId = u32;

/// How a text leaf matches its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatch {
    /// Contained anywhere in the field value.
    #[default]
    Substring,
    /// The field value (or one array element) equals the text.
    Exact,
}

/// Leaf kinds addressable by autocomplete and scope checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    AnyText,
    Keyword,
    Caption,
    FileName,
    Person,
    Directory,
    Position,
    Distance,
}

/// Payload shared by every text-matching leaf.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextLeaf {
    pub text: String,
    #[serde(default)]
    pub negate: bool,
    #[serde(default)]
    pub match_type: TextMatch,
    #[serde(skip)]
    pub query_id: Option<QueryId>,
}

impl TextLeaf {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Origin of a distance query: free text, resolved coordinates, or both once
/// resolution has run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaceRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps: Option<GpsPoint>,
}

/// "Within N km of a place" leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceLeaf {
    pub from: PlaceRef,
    pub distance_km: f64,
    #[serde(default)]
    pub negate: bool,
    #[serde(skip)]
    pub query_id: Option<QueryId>,
}

/// Creation-date bound. The value is required at compile time; keeping it
/// optional here mirrors the wire format, where clients may omit it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DateLeaf {
    #[serde(default)]
    pub value: Option<DateTime<Utc>>,
    #[serde(default)]
    pub negate: bool,
    #[serde(skip)]
    pub query_id: Option<QueryId>,
}

/// Rating bound (stars).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingLeaf {
    #[serde(default)]
    pub value: Option<i32>,
    #[serde(default)]
    pub negate: bool,
    #[serde(skip)]
    pub query_id: Option<QueryId>,
}

/// Resolution bound in megapixels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolutionLeaf {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub negate: bool,
    #[serde(skip)]
    pub query_id: Option<QueryId>,
}

/// Landscape/portrait toggle. Negation is not supported for orientation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrientationLeaf {
    pub landscape: bool,
    #[serde(skip)]
    pub query_id: Option<QueryId>,
}

/// A search query tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchQuery {
    And {
        list: Vec<SearchQuery>,
    },
    Or {
        list: Vec<SearchQuery>,
    },
    /// True iff at least `min` children are true. Rewritten into And/Or by
    /// normalization; `min` absent or zero means 1.
    SomeOf {
        list: Vec<SearchQuery>,
        #[serde(default)]
        min: Option<u32>,
    },
    AnyText(TextLeaf),
    Keyword(TextLeaf),
    Caption(TextLeaf),
    FileName(TextLeaf),
    Person(TextLeaf),
    Directory(TextLeaf),
    Position(TextLeaf),
    Distance(DistanceLeaf),
    FromDate(DateLeaf),
    ToDate(DateLeaf),
    MinRating(RatingLeaf),
    MaxRating(RatingLeaf),
    MinResolution(ResolutionLeaf),
    MaxResolution(ResolutionLeaf),
    Orientation(OrientationLeaf),
}

impl SearchQuery {
    /// Children of a combinator node, `None` for leaves.
    pub fn children(&self) -> Option<&[SearchQuery]> {
        match self {
            Self::And { list } | Self::Or { list } | Self::SomeOf { list, .. } => Some(list),
            _ => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<SearchQuery>> {
        match self {
            Self::And { list } | Self::Or { list } | Self::SomeOf { list, .. } => Some(list),
            _ => None,
        }
    }

    /// Query ID of a leaf, `None` for combinators or before normalization.
    pub fn query_id(&self) -> Option<QueryId> {
        match self {
            Self::And { .. } | Self::Or { .. } | Self::SomeOf { .. } => None,
            Self::AnyText(l)
            | Self::Keyword(l)
            | Self::Caption(l)
            | Self::FileName(l)
            | Self::Person(l)
            | Self::Directory(l)
            | Self::Position(l) => l.query_id,
            Self::Distance(l) => l.query_id,
            Self::FromDate(l) | Self::ToDate(l) => l.query_id,
            Self::MinRating(l) | Self::MaxRating(l) => l.query_id,
            Self::MinResolution(l) | Self::MaxResolution(l) => l.query_id,
            Self::Orientation(l) => l.query_id,
        }
    }

    pub(crate) fn set_query_id(&mut self, id: QueryId) {
        match self {
            Self::And { .. } | Self::Or { .. } | Self::SomeOf { .. } => {}
            Self::AnyText(l)
            | Self::Keyword(l)
            | Self::Caption(l)
            | Self::FileName(l)
            | Self::Person(l)
            | Self::Directory(l)
            | Self::Position(l) => l.query_id = Some(id),
            Self::Distance(l) => l.query_id = Some(id),
            Self::FromDate(l) | Self::ToDate(l) => l.query_id = Some(id),
            Self::MinRating(l) | Self::MaxRating(l) => l.query_id = Some(id),
            Self::MinResolution(l) | Self::MaxResolution(l) => l.query_id = Some(id),
            Self::Orientation(l) => l.query_id = Some(id),
        }
    }
}
