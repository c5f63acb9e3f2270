//! SQL dialects and predicate rendering.
//!
//! The renderer is the only place that knows column names and dialect syntax;
//! it turns the abstract predicate tree into a `WHERE` fragment with
//! positional `?` placeholders and the matching bind list. Repeated parameter
//! names simply re-bind the same value.

use serde::{Deserialize, Serialize};

use crate::search::predicate::{BindValue, Field, Predicate};

/// The two SQL dialects the catalog runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    Sqlite,
    MySql,
}

impl SqlDialect {
    /// Escape a literal destined for a LIKE pattern. MySQL strings use
    /// C-style escapes, so a backslash must be doubled to survive into the
    /// pattern; SQLite patterns take the text as-is.
    pub fn escape_like(self, raw: &str) -> String {
        match self {
            Self::Sqlite => raw.to_string(),
            Self::MySql => raw.replace('\\', "\\\\"),
        }
    }

    /// Case-insensitive collation applied to text comparisons.
    pub fn collation(self) -> &'static str {
        match self {
            Self::Sqlite => "NOCASE",
            Self::MySql => "utf8mb4_general_ci",
        }
    }

    /// Random ordering expression for single-row sampling.
    pub fn random_order(self) -> &'static str {
        match self {
            Self::Sqlite => "RANDOM()",
            Self::MySql => "RAND()",
        }
    }
}

/// A rendered `WHERE` fragment plus its binds, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// Render a predicate for one dialect.
pub fn render(predicate: &Predicate, dialect: SqlDialect) -> SqlFragment {
    let mut sql = String::new();
    let mut binds = Vec::new();
    render_node(predicate, dialect, &mut sql, &mut binds);
    SqlFragment { sql, binds }
}

fn render_node(
    predicate: &Predicate,
    dialect: SqlDialect,
    sql: &mut String,
    binds: &mut Vec<BindValue>,
) {
    match predicate {
        // An empty conjunction holds vacuously; an empty disjunction never
        // holds. Rendering them explicitly keeps empty combinators defined.
        Predicate::All(list) if list.is_empty() => sql.push_str("1 = 1"),
        Predicate::Any(list) if list.is_empty() => sql.push_str("1 = 0"),
        Predicate::All(list) => render_composite(list, " AND ", dialect, sql, binds),
        Predicate::Any(list) => render_composite(list, " OR ", dialect, sql, binds),
        Predicate::Compare { field, op, bind } => {
            sql.push_str(column(*field));
            sql.push(' ');
            sql.push_str(op.sql());
            sql.push_str(" ?");
            binds.push(bind.value.clone());
        }
        Predicate::CompareFields { left, op, right } => {
            sql.push_str(column(*left));
            sql.push(' ');
            sql.push_str(op.sql());
            sql.push(' ');
            sql.push_str(column(*right));
        }
        Predicate::Like {
            field,
            pattern,
            negated,
        } => {
            sql.push_str(column(*field));
            sql.push_str(if *negated { " NOT LIKE ? COLLATE " } else { " LIKE ? COLLATE " });
            sql.push_str(dialect.collation());
            binds.push(pattern.value.clone());
        }
        Predicate::IsNull(field) => {
            sql.push_str(column(*field));
            sql.push_str(" IS NULL");
        }
    }
}

fn render_composite(
    list: &[Predicate],
    separator: &str,
    dialect: SqlDialect,
    sql: &mut String,
    binds: &mut Vec<BindValue>,
) {
    sql.push('(');
    for (index, child) in list.iter().enumerate() {
        if index > 0 {
            sql.push_str(separator);
        }
        render_node(child, dialect, sql, binds);
    }
    sql.push(')');
}

fn column(field: Field) -> &'static str {
    match field {
        Field::MediaName => "media.name",
        Field::Caption => "media.caption",
        Field::PositionCountry => "media.country",
        Field::PositionState => "media.state",
        Field::PositionCity => "media.city",
        Field::Latitude => "media.latitude",
        Field::Longitude => "media.longitude",
        Field::CreationDate => "media.creation_date",
        Field::Rating => "media.rating",
        Field::Resolution => "(media.width * media.height)",
        Field::Width => "media.width",
        Field::Height => "media.height",
        Field::Keywords => "media.keywords",
        Field::Persons => "media.persons",
        Field::DirectoryPath => "directory.path",
        Field::DirectoryName => "directory.name",
    }
}
