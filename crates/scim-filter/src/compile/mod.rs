//! Module: compile
//! Responsibility: lowering a parsed filter tree into a backend predicate,
//! including literal coercion, satellite-join memoization, and the
//! tri-state `Valid`/`Unsupported` combination rules.
//! Does not own: the filter grammar or the backend's predicate internals.
//! Boundary: pure and synchronous; the memoized join handle is the only
//! state, and it is local to one compilation call.

mod builder;
mod coercion;
mod compiler;
mod trace;

#[cfg(test)]
mod tests;

pub use builder::PredicateBuilder;
pub use compiler::{CompiledFilter, FilterCompiler, MAX_COMPILE_DEPTH};
pub use trace::{CompileTraceEvent, CompileTraceSink};

use crate::schema::ResolverError;
use thiserror::Error as ThisError;

///
/// CompileError
///
/// Fatal compilation failures. An unknown attribute is *not* an error; it
/// is the `Unsupported` outcome and propagates structurally. Compilation
/// either yields a complete result for the whole filter or fails here
/// atomically.
///

#[derive(Debug, ThisError)]
pub enum CompileError {
    /// A literal that cannot be coerced to the attribute's declared type.
    /// User-facing filter-syntax error.
    #[error("malformed literal `{literal}`: expected {expected}")]
    MalformedLiteral {
        literal: String,
        expected: &'static str,
    },

    #[error("filter nesting exceeds the maximum depth of {limit}")]
    DepthExceeded { limit: u32 },

    #[error(transparent)]
    Resolver(#[from] ResolverError),
}
