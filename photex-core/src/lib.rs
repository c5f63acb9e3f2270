//! # Photex Core
//!
//! Core library for the Photex gallery server: it compiles structured,
//! user-composable search queries into parameterized SQL predicates and
//! orchestrates their execution against the media catalog.
//!
//! ## Overview
//!
//! - **Query model**: a closed tagged-union tree of boolean combinators and
//!   leaf conditions ([`search::types`]).
//! - **Normalization**: per-leaf ID stamping and "M of N" quantifier
//!   flattening ([`search::normalize`]).
//! - **Geo resolution**: free-text places become coordinates via the
//!   external geocoder; distance queries use a rectangular bounding-box
//!   approximation ([`search::geo`], [`geocode`]).
//! - **Compilation**: the normalized tree becomes an abstract predicate
//!   rendered per SQL dialect with positional binds ([`search::compile`],
//!   [`sql`]).
//! - **Directory projection**: the same query restricted to the leaves that
//!   are meaningful for folder matching ([`search::directory`]).
//! - **Autocomplete**: per-category candidate extraction with first-seen
//!   dedup, reachable through [`search::service::SearchService`].
//!
//! Storage and geocoding are consumed through narrow contracts
//! ([`database::ports::SearchRepository`], [`geocode::Geocoder`]); a
//! reference SQLite repository ships behind the `database` feature.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod database;
pub mod error;
pub mod geocode;
pub mod model;
pub mod search;
pub mod settings;
pub mod sql;

pub use error::{GalleryError, Result};
pub use search::{SearchQuery, SearchResult, SearchService};
