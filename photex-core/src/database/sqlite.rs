//! Reference SQLite implementation of the storage contract.
//!
//! Renders predicates through [`crate::sql::render`] and binds positionally.
//! See [`crate::model`] for the schema this repository assumes.

use async_trait::async_trait;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::sqlite::{Sqlite, SqliteArguments, SqlitePool};

use crate::database::ports::{CandidateField, SearchRepository};
use crate::error::Result;
use crate::model::{DirectoryRow, MediaRow, MetaFileRow, PositionRow};
use crate::search::predicate::{BindValue, Predicate};
use crate::sql::{render, SqlDialect};

const MEDIA_SELECT: &str = "SELECT media.id, media.directory_id, media.name, media.caption, \
     media.keywords, media.persons, media.country, media.state, media.city, \
     media.latitude, media.longitude, media.creation_date, media.rating, \
     media.width, media.height \
     FROM media media \
     LEFT JOIN directory directory ON directory.id = media.directory_id";

const MEDIA_JOIN: &str =
    "FROM media media LEFT JOIN directory directory ON directory.id = media.directory_id";

/// Catalog repository over a `sqlx` SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteSearchRepository {
    pool: SqlitePool,
}

impl SqliteSearchRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn bind_rows<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    binds: &'q [BindValue],
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for bind in binds {
        query = match bind {
            BindValue::Text(text) => query.bind(text.as_str()),
            BindValue::Int(value) => query.bind(*value),
            BindValue::Float(value) => query.bind(*value),
        };
    }
    query
}

fn bind_scalar<'q, O>(
    mut query: QueryScalar<'q, Sqlite, O, SqliteArguments<'q>>,
    binds: &'q [BindValue],
) -> QueryScalar<'q, Sqlite, O, SqliteArguments<'q>> {
    for bind in binds {
        query = match bind {
            BindValue::Text(text) => query.bind(text.as_str()),
            BindValue::Int(value) => query.bind(*value),
            BindValue::Float(value) => query.bind(*value),
        };
    }
    query
}

#[async_trait]
impl SearchRepository for SqliteSearchRepository {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Sqlite
    }

    async fn media_matching(&self, predicate: &Predicate, limit: u32) -> Result<Vec<MediaRow>> {
        let fragment = render(predicate, self.dialect());
        let sql = format!("{MEDIA_SELECT} WHERE {} LIMIT {limit}", fragment.sql);
        tracing::debug!(%sql, binds = fragment.binds.len(), "querying media");
        let rows = bind_rows(sqlx::query_as::<_, MediaRow>(&sql), &fragment.binds)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn meta_files_matching(&self, predicate: &Predicate) -> Result<Vec<MetaFileRow>> {
        let fragment = render(predicate, self.dialect());
        let sql = format!(
            "SELECT file.id, file.directory_id, file.name FROM meta_file file \
             INNER JOIN (SELECT DISTINCT directory.id AS id {MEDIA_JOIN} WHERE {}) dir \
             ON file.directory_id = dir.id",
            fragment.sql
        );
        let rows = bind_rows(sqlx::query_as::<_, MetaFileRow>(&sql), &fragment.binds)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn directories_matching(
        &self,
        predicate: &Predicate,
        limit: u32,
    ) -> Result<Vec<DirectoryRow>> {
        let fragment = render(predicate, self.dialect());
        let sql = format!(
            "SELECT directory.id, directory.name, directory.path FROM directory directory \
             WHERE {} LIMIT {limit}",
            fragment.sql
        );
        let rows = bind_rows(sqlx::query_as::<_, DirectoryRow>(&sql), &fragment.binds)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn count_matching(&self, predicate: &Predicate) -> Result<u64> {
        let fragment = render(predicate, self.dialect());
        let sql = format!("SELECT COUNT(*) {MEDIA_JOIN} WHERE {}", fragment.sql);
        let count = bind_scalar(sqlx::query_scalar::<_, i64>(&sql), &fragment.binds)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn random_matching(&self, predicate: &Predicate) -> Result<Option<MediaRow>> {
        let fragment = render(predicate, self.dialect());
        let sql = format!(
            "{MEDIA_SELECT} WHERE {} ORDER BY {} LIMIT 1",
            fragment.sql,
            self.dialect().random_order()
        );
        let row = bind_rows(sqlx::query_as::<_, MediaRow>(&sql), &fragment.binds)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn distinct_values(
        &self,
        field: CandidateField,
        pattern: &str,
        limit: u32,
    ) -> Result<Vec<String>> {
        let collation = self.dialect().collation();
        let sql = match field {
            CandidateField::Keywords => format!(
                "SELECT DISTINCT media.keywords FROM media media \
                 WHERE media.keywords LIKE ? COLLATE {collation} LIMIT {limit}"
            ),
            CandidateField::PersonName => format!(
                "SELECT DISTINCT person.name FROM person person \
                 WHERE person.name LIKE ? COLLATE {collation} \
                 ORDER BY person.name LIMIT {limit}"
            ),
            CandidateField::MediaName => format!(
                "SELECT DISTINCT media.name FROM media media \
                 WHERE media.name LIKE ? COLLATE {collation} LIMIT {limit}"
            ),
            CandidateField::Caption => format!(
                "SELECT DISTINCT media.caption FROM media media \
                 WHERE media.caption LIKE ? COLLATE {collation} LIMIT {limit}"
            ),
            CandidateField::DirectoryName => format!(
                "SELECT DISTINCT directory.name FROM directory directory \
                 WHERE directory.name LIKE ? COLLATE {collation} LIMIT {limit}"
            ),
        };
        let values = sqlx::query_scalar::<_, String>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(values)
    }

    async fn position_candidates(&self, pattern: &str, limit: u32) -> Result<Vec<PositionRow>> {
        let collation = self.dialect().collation();
        let sql = format!(
            "SELECT media.country AS country, media.state AS state, media.city AS city \
             FROM media media \
             WHERE media.country LIKE ? COLLATE {collation} \
                OR media.state LIKE ? COLLATE {collation} \
                OR media.city LIKE ? COLLATE {collation} \
             GROUP BY media.country, media.state, media.city LIMIT {limit}"
        );
        let rows = sqlx::query_as::<_, PositionRow>(&sql)
            .bind(pattern)
            .bind(pattern)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
