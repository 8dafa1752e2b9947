//! SCIM 2.0 filter-expression compiler: parses RFC 7644 resource filters
//! and lowers them into backend-agnostic, composable query predicates.
//!
//! The pipeline runs leaves-first: an [`schema::AttributeResolver`] maps
//! external attribute paths onto the storage model, a
//! [`compile::PredicateBuilder`] turns one resolved attribute plus an
//! operator and literal into a backend predicate, and the
//! [`compile::FilterCompiler`] walks the parse tree combining results
//! with tri-state `Valid`/`Unsupported` rules.
#![warn(unreachable_pub)]

pub mod backend;
pub mod compile;
pub mod error;
pub mod filter;
pub mod schema;

pub use error::FilterError;

use backend::QueryBackend;
use compile::{CompiledFilter, FilterCompiler};
use schema::AttributeResolver;

/// Parse and compile a filter string in one step.
///
/// Callers must translate a top-level `Unsupported` outcome into a
/// predicate matching zero rows; see
/// [`CompiledFilter::or_match_none`].
pub fn compile_filter<R, B>(
    input: &str,
    resolver: &R,
    backend: &mut B,
) -> Result<CompiledFilter<B::Predicate>, FilterError>
where
    R: AttributeResolver,
    B: QueryBackend,
{
    let filter = filter::parse_filter(input)?;
    let mut compiler = FilterCompiler::new(resolver, backend);

    Ok(compiler.compile(&filter)?)
}

///
/// Prelude
///
/// Domain vocabulary only; no errors or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        backend::{QueryBackend, ScalarValue},
        compile::{CompiledFilter, FilterCompiler},
        filter::{Filter, FilterNode, FilterOp, Literal, parse_filter},
        schema::{AttributeDescriptor, AttributeResolver, SchemaMap, ValueKind},
    };
}
