//! Filter language front-end: AST, lexer, and recursive-descent parser
//! for RFC 7644 §3.4.2.2 resource filters.

mod ast;
mod lexer;
mod parser;

#[cfg(test)]
mod tests;

pub use ast::{Filter, FilterNode, FilterOp, Literal};
pub use parser::{MAX_NESTING_DEPTH, parse_filter};

use thiserror::Error as ThisError;

///
/// ParseError
///
/// User-facing filter-syntax errors raised by the lexer and parser.
///

#[derive(Debug, ThisError)]
pub enum ParseError {
    #[error("filter expression cannot be empty")]
    Empty,

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid escape sequence `{sequence}`")]
    InvalidEscape { sequence: String },

    #[error("unexpected token `{token}`")]
    UnexpectedToken { token: String },

    #[error("unexpected end of filter expression")]
    UnexpectedEnd,

    #[error("unknown operator `{token}`")]
    UnknownOperator { token: String },

    #[error("trailing input after filter expression: `{token}`")]
    TrailingInput { token: String },

    #[error("filter nesting exceeds the maximum depth of {limit}")]
    DepthExceeded { limit: u32 },
}
