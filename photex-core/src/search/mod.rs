//! The search pipeline: query model, normalization, geo resolution,
//! predicate compilation, directory projection, and orchestration.

mod autocomplete;
pub mod compile;
pub mod directory;
pub mod geo;
pub mod normalize;
pub mod predicate;
pub mod service;
pub mod types;

pub use compile::compile;
pub use directory::directory_scope;
pub use geo::{resolve_places, BoundingBox, EARTH_RADIUS_KM};
pub use normalize::{normalize, NormalizedQuery};
pub use predicate::{Bind, BindValue, CompareOp, Field, Predicate};
pub use service::{SearchResult, SearchService};
pub use types::{
    DateLeaf, DistanceLeaf, GpsPoint, OrientationLeaf, PlaceRef, QueryId, RatingLeaf,
    ResolutionLeaf, SearchKind, SearchQuery, TextLeaf, TextMatch,
};
