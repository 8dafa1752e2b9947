use crate::{compile::CompileError, filter::ParseError};
use thiserror::Error as ThisError;

///
/// FilterError
///
/// Crate-level error covering both phases of filter evaluation: parsing
/// the filter text and compiling the parse tree against a schema.
///

#[derive(Debug, ThisError)]
pub enum FilterError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}
