//! Storage contract and backends.

pub mod ports;

#[cfg(feature = "database")]
pub mod sqlite;

pub use ports::{CandidateField, SearchRepository};

#[cfg(feature = "database")]
pub use sqlite::SqliteSearchRepository;
