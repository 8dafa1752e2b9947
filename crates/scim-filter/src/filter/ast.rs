use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// Filter AST
///
/// Pure representation of a parsed RFC 7644 filter expression. This layer
/// carries no schema knowledge; attribute paths are raw strings and
/// literals keep their source form. All interpretation happens during
/// compilation.
///

///
/// Filter
///
/// Root of one parsed filter expression. Produced once per evaluation
/// request, immutable, and discarded after compilation.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub root: FilterNode,
}

///
/// FilterOp
///
/// Comparison operator tokens of the filter grammar. Closed set; the
/// parser rejects anything else, so no unknown-operator case can reach
/// the predicate builder.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum FilterOp {
    #[display("eq")]
    Eq,
    #[display("ne")]
    Ne,
    #[display("co")]
    Co,
    #[display("sw")]
    Sw,
    #[display("ew")]
    Ew,
    #[display("gt")]
    Gt,
    #[display("ge")]
    Ge,
    #[display("lt")]
    Lt,
    #[display("le")]
    Le,
}

impl FilterOp {
    /// Operator tokens are case-insensitive.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "co" => Some(Self::Co),
            "sw" => Some(Self::Sw),
            "ew" => Some(Self::Ew),
            "gt" => Some(Self::Gt),
            "ge" => Some(Self::Ge),
            "lt" => Some(Self::Lt),
            "le" => Some(Self::Le),
            _ => None,
        }
    }
}

///
/// Literal
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Double-quoted string; JSON escapes are already resolved by the lexer.
    Str(String),
    Bool(bool),
    /// Numeric literal kept as its source lexeme. Coercion decides whether
    /// it means text, an epoch timestamp, or something malformed.
    Number(String),
    Null,
}

impl Literal {
    /// Raw text used by the default (uncoerced) comparison path.
    /// `Null` has no textual form.
    #[must_use]
    pub(crate) fn as_text(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Number(n) => Some(n),
            Self::Bool(true) => Some("true"),
            Self::Bool(false) => Some("false"),
            Self::Null => None,
        }
    }
}

///
/// FilterNode
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum FilterNode {
    Or(Box<Self>, Box<Self>),
    And(Box<Self>, Box<Self>),
    Not(Box<Self>),
    /// Parenthesized sub-expression. Grouping carries no semantic weight
    /// beyond the tree shape already fixed by the parser.
    Group(Box<Self>),
    Present {
        path: String,
    },
    Compare {
        path: String,
        op: FilterOp,
        literal: Literal,
    },
}
