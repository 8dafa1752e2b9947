use crate::backend::{CompareOp, LIKE_ESCAPE, QueryBackend, ScalarValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Alias of the resource's root table in rendered SQL.
pub const ROOT_ALIAS: &str = "r";

/// Name of the satellite name/value attribute table.
pub const ATTRIBUTE_TABLE: &str = "resource_attribute";

///
/// AttributeJoin
///
/// Handle to one LEFT JOIN against the satellite attribute table. The
/// compiler memoizes a single handle per compilation, so a rendered
/// query carries at most one attribute join.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AttributeJoin {
    index: u32,
}

impl AttributeJoin {
    #[must_use]
    pub fn alias(self) -> String {
        format!("sa{}", self.index)
    }
}

///
/// ColumnRef
///
/// Comparison target inside a rendered predicate: either a column on the
/// root record or one of the two satellite join columns.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ColumnRef {
    RootField(String),
    JoinName(AttributeJoin),
    JoinValue(AttributeJoin),
}

impl ColumnRef {
    fn sql(&self) -> String {
        match self {
            Self::RootField(field) => format!("{ROOT_ALIAS}.{field}"),
            Self::JoinName(join) => format!("{}.name", join.alias()),
            Self::JoinValue(join) => format!("{}.value", join.alias()),
        }
    }

    const fn join_index(&self) -> Option<u32> {
        match self {
            Self::RootField(_) => None,
            Self::JoinName(join) | Self::JoinValue(join) => Some(join.index),
        }
    }
}

///
/// QueryPredicate
///
/// Structured predicate tree produced by [`SqlBackend`]. Renderable to a
/// parameterized WHERE fragment; also convenient for structural
/// assertions in tests.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum QueryPredicate {
    MatchNone,
    IsNotNull {
        column: ColumnRef,
    },
    Compare {
        column: ColumnRef,
        op: CompareOp,
        value: ScalarValue,
    },
    Like {
        column: ColumnRef,
        pattern: String,
    },
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
}

///
/// SqlFilter
///
/// Rendered SQL output: a WHERE fragment with `?` placeholders, the bind
/// values in order, and the attribute-join clause when any satellite
/// attribute is referenced.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SqlFilter {
    pub where_clause: String,
    pub bindings: Vec<ScalarValue>,
    pub attribute_join: Option<String>,
}

impl QueryPredicate {
    #[must_use]
    pub fn to_sql(&self) -> SqlFilter {
        let mut bindings = Vec::new();
        let where_clause = render(self, &mut bindings);

        let mut joins = BTreeSet::new();
        collect_joins(self, &mut joins);
        let attribute_join = join_clause(&joins);

        SqlFilter {
            where_clause,
            bindings,
            attribute_join,
        }
    }
}

fn render(predicate: &QueryPredicate, bindings: &mut Vec<ScalarValue>) -> String {
    match predicate {
        QueryPredicate::MatchNone => "1 = 0".to_string(),
        QueryPredicate::IsNotNull { column } => format!("{} IS NOT NULL", column.sql()),
        QueryPredicate::Compare { column, op, value } => match value {
            // A null comparison binds nothing and can never be true,
            // mirroring criteria-builder behavior for null literals.
            ScalarValue::Null => format!("{} {} NULL", column.sql(), sql_symbol(*op)),
            _ => {
                bindings.push(value.clone());
                format!("{} {} ?", column.sql(), sql_symbol(*op))
            }
        },
        QueryPredicate::Like { column, pattern } => {
            bindings.push(ScalarValue::Text(pattern.clone()));
            format!("{} LIKE ? ESCAPE '{LIKE_ESCAPE}'", column.sql())
        }
        QueryPredicate::And(children) => render_group(children, " AND ", "1 = 1", bindings),
        QueryPredicate::Or(children) => render_group(children, " OR ", "1 = 0", bindings),
        QueryPredicate::Not(inner) => format!("NOT ({})", render(inner, bindings)),
    }
}

/// Empty groups render as their identity element, matching the empty
/// conjunction/disjunction of criteria-builder APIs.
fn render_group(
    children: &[QueryPredicate],
    separator: &str,
    identity: &str,
    bindings: &mut Vec<ScalarValue>,
) -> String {
    match children {
        [] => identity.to_string(),
        [only] => render(only, bindings),
        _ => {
            let parts: Vec<String> = children.iter().map(|c| render(c, bindings)).collect();
            format!("({})", parts.join(separator))
        }
    }
}

fn collect_joins(predicate: &QueryPredicate, out: &mut BTreeSet<u32>) {
    match predicate {
        QueryPredicate::MatchNone => {}
        QueryPredicate::IsNotNull { column }
        | QueryPredicate::Compare { column, .. }
        | QueryPredicate::Like { column, .. } => {
            if let Some(index) = column.join_index() {
                out.insert(index);
            }
        }
        QueryPredicate::And(children) | QueryPredicate::Or(children) => {
            for child in children {
                collect_joins(child, out);
            }
        }
        QueryPredicate::Not(inner) => collect_joins(inner, out),
    }
}

fn join_clause(joins: &BTreeSet<u32>) -> Option<String> {
    if joins.is_empty() {
        return None;
    }

    let clauses: Vec<String> = joins
        .iter()
        .map(|index| {
            let alias = AttributeJoin { index: *index }.alias();
            format!(
                "LEFT JOIN {ATTRIBUTE_TABLE} {alias} ON {alias}.resource_id = {ROOT_ALIAS}.id"
            )
        })
        .collect();

    Some(clauses.join(" "))
}

const fn sql_symbol(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Eq => "=",
        CompareOp::Ne => "<>",
        CompareOp::Lt => "<",
        CompareOp::Lte => "<=",
        CompareOp::Gt => ">",
        CompareOp::Gte => ">=",
    }
}

///
/// SqlBackend
///
/// Stock [`QueryBackend`] building [`QueryPredicate`] trees. Tracks how
/// many attribute joins have been handed out, which also allocates the
/// join aliases.
///

#[derive(Debug, Default)]
pub struct SqlBackend {
    joins_created: u32,
}

impl SqlBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of satellite joins handed out so far. At most one per
    /// compilation when driven by the compiler.
    #[must_use]
    pub const fn joins_created(&self) -> u32 {
        self.joins_created
    }
}

impl QueryBackend for SqlBackend {
    type Expr = ColumnRef;
    type Predicate = QueryPredicate;
    type JoinHandle = AttributeJoin;

    fn root_field(&mut self, name: &str) -> ColumnRef {
        ColumnRef::RootField(name.to_string())
    }

    fn attribute_join(&mut self) -> AttributeJoin {
        let join = AttributeJoin {
            index: self.joins_created,
        };
        self.joins_created += 1;
        join
    }

    fn join_name(&mut self, join: &AttributeJoin) -> ColumnRef {
        ColumnRef::JoinName(*join)
    }

    fn join_value(&mut self, join: &AttributeJoin) -> ColumnRef {
        ColumnRef::JoinValue(*join)
    }

    fn is_not_null(&mut self, expr: ColumnRef) -> QueryPredicate {
        QueryPredicate::IsNotNull { column: expr }
    }

    fn compare(&mut self, expr: ColumnRef, op: CompareOp, value: ScalarValue) -> QueryPredicate {
        QueryPredicate::Compare {
            column: expr,
            op,
            value,
        }
    }

    fn like(&mut self, expr: ColumnRef, pattern: String) -> QueryPredicate {
        QueryPredicate::Like {
            column: expr,
            pattern,
        }
    }

    fn conjoin(&mut self, left: QueryPredicate, right: QueryPredicate) -> QueryPredicate {
        if let QueryPredicate::And(mut children) = left {
            children.push(right);
            return QueryPredicate::And(children);
        }
        QueryPredicate::And(vec![left, right])
    }

    fn disjoin(&mut self, left: QueryPredicate, right: QueryPredicate) -> QueryPredicate {
        if let QueryPredicate::Or(mut children) = left {
            children.push(right);
            return QueryPredicate::Or(children);
        }
        QueryPredicate::Or(vec![left, right])
    }

    fn negate(&mut self, inner: QueryPredicate) -> QueryPredicate {
        QueryPredicate::Not(Box::new(inner))
    }

    fn match_none(&mut self) -> QueryPredicate {
        QueryPredicate::MatchNone
    }
}
