//! Module: backend
//! Responsibility: the predicate-construction contract the compiler
//! composes against, plus the stock SQL backend.
//! Does not own: filter parsing, attribute resolution, or tri-state
//! combination rules.
//! Boundary: the compiler never inspects a backend predicate's internals;
//! it only combines predicates through the constructors declared here.

mod sql;

pub use sql::{
    ATTRIBUTE_TABLE, AttributeJoin, ColumnRef, QueryPredicate, ROOT_ALIAS, SqlBackend, SqlFilter,
};

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Escape character used in LIKE patterns. Pattern literals escape the
/// backend wildcards `%` and `_` plus this character itself.
pub const LIKE_ESCAPE: char = '\\';

///
/// CompareOp
///
/// Backend-facing comparison operators. Pattern operators (`co`/`sw`/`ew`)
/// are not represented here; they reach the backend as LIKE patterns.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

///
/// ScalarValue
///
/// Coerced literal value bound into a backend predicate.
///

#[derive(Clone, Debug, Display, Eq, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    #[display("{_0}")]
    Text(String),
    #[display("{_0}")]
    Bool(bool),
    #[display("{_0}")]
    TimestampMillis(i64),
    #[display("null")]
    Null,
}

///
/// QueryBackend
///
/// Produced contract between the compiler and a storage engine, modeled
/// on a criteria-builder surface: expressions name comparison targets,
/// predicates compose through conjunction/disjunction/negation.
///
/// The join handle returned by [`attribute_join`](Self::attribute_join)
/// references the satellite name/value table. The compiler creates at
/// most one per compilation and reuses it for every satellite attribute
/// reference; backends must treat each call as a fresh join instance.
///

pub trait QueryBackend {
    type Expr;
    type Predicate;
    type JoinHandle: Clone;

    /// Expression naming a column on the resource's root record.
    fn root_field(&mut self, name: &str) -> Self::Expr;

    /// Fresh join against the satellite attribute table.
    fn attribute_join(&mut self) -> Self::JoinHandle;

    /// Expression naming the satellite table's attribute-name column.
    fn join_name(&mut self, join: &Self::JoinHandle) -> Self::Expr;

    /// Expression naming the satellite table's attribute-value column.
    fn join_value(&mut self, join: &Self::JoinHandle) -> Self::Expr;

    fn is_not_null(&mut self, expr: Self::Expr) -> Self::Predicate;

    fn compare(&mut self, expr: Self::Expr, op: CompareOp, value: ScalarValue) -> Self::Predicate;

    /// Pattern match. `pattern` is fully escaped and wildcard-wrapped by
    /// the caller, with [`LIKE_ESCAPE`] as the escape character.
    fn like(&mut self, expr: Self::Expr, pattern: String) -> Self::Predicate;

    fn conjoin(&mut self, left: Self::Predicate, right: Self::Predicate) -> Self::Predicate;

    fn disjoin(&mut self, left: Self::Predicate, right: Self::Predicate) -> Self::Predicate;

    fn negate(&mut self, inner: Self::Predicate) -> Self::Predicate;

    /// Predicate matching zero rows. Callers surface a fully-unsupported
    /// filter through this, never as a match-everything predicate.
    fn match_none(&mut self) -> Self::Predicate;
}
