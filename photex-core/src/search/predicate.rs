//! Abstract predicate expression tree.
//!
//! The compiler emits this tree instead of SQL text; a dialect-aware renderer
//! (see [`crate::sql`]) turns it into a parameterized fragment. No user input
//! ever reaches the SQL string itself, only the bind list.

use crate::search::types::QueryId;

/// A named-field reference. The renderer maps each field to its column
/// expression, so the compiler stays free of schema details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    MediaName,
    Caption,
    PositionCountry,
    PositionState,
    PositionCity,
    Latitude,
    Longitude,
    CreationDate,
    Rating,
    /// Total pixel count; renders as `width * height`.
    Resolution,
    Width,
    Height,
    Keywords,
    Persons,
    DirectoryPath,
    DirectoryName,
}

/// Relational comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn sql(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// A value bound into the predicate at execution time.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i64),
    Float(f64),
}

/// A named bind. The name is the leaf's kind prefix plus its query ID, so two
/// leaves querying the same field never share a parameter; duplicated leaves
/// (quantifier expansion) share both name and value.
#[derive(Debug, Clone, PartialEq)]
pub struct Bind {
    pub name: String,
    pub value: BindValue,
}

impl Bind {
    pub fn text(prefix: &str, id: QueryId, value: impl Into<String>) -> Self {
        Self {
            name: format!("{prefix}{id}"),
            value: BindValue::Text(value.into()),
        }
    }

    pub fn int(prefix: &str, id: QueryId, value: i64) -> Self {
        Self {
            name: format!("{prefix}{id}"),
            value: BindValue::Int(value),
        }
    }

    pub fn float(prefix: &str, id: QueryId, value: f64) -> Self {
        Self {
            name: format!("{prefix}{id}"),
            value: BindValue::Float(value),
        }
    }
}

/// A boolean predicate over catalog rows.
///
/// `All([])` is always true and `Any([])` always false; the renderer emits
/// explicit `1 = 1` / `1 = 0` so an empty combinator keeps a defined meaning.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
    Compare {
        field: Field,
        op: CompareOp,
        bind: Bind,
    },
    CompareFields {
        left: Field,
        op: CompareOp,
        right: Field,
    },
    Like {
        field: Field,
        pattern: Bind,
        negated: bool,
    },
    IsNull(Field),
}

impl Predicate {
    /// Join parts with OR, or AND when `negated` (the polarity a negated
    /// multi-part leaf needs so that no part may match).
    pub(crate) fn joined(negated: bool, parts: Vec<Predicate>) -> Predicate {
        if negated {
            Predicate::All(parts)
        } else {
            Predicate::Any(parts)
        }
    }

    /// The opposite polarity of [`Predicate::joined`].
    pub(crate) fn joined_rev(negated: bool, parts: Vec<Predicate>) -> Predicate {
        Self::joined(!negated, parts)
    }
}
