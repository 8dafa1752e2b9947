use crate::{
    backend::{CompareOp, QueryBackend, ScalarValue},
    compile::{
        CompileError,
        coercion,
        compiler::CompiledFilter,
        trace::{CompileTraceEvent, CompileTraceSink},
    },
    filter::{FilterOp, Literal},
    schema::{AttributeDescriptor, AttributeResolver, ValueKind},
};

///
/// PredicateBuilder
///
/// Builds one backend predicate per attribute reference, branching
/// between the root record's columns and the satellite name/value join
/// and coercing literals to the attribute's declared value kind.
///
/// The attribute join is created lazily and memoized: every satellite
/// reference within one compilation shares the same handle. A second
/// independent join would silently turn AND across different satellite
/// attributes into a self-join mismatch.
///

pub struct PredicateBuilder<'a, R, B: QueryBackend> {
    resolver: &'a R,
    pub(super) backend: &'a mut B,
    join: Option<B::JoinHandle>,
    pub(super) trace: Option<&'a dyn CompileTraceSink>,
}

/// Pattern shapes for the `co`/`sw`/`ew` operators.
#[derive(Clone, Copy)]
enum TextMatch {
    Contains,
    StartsWith,
    EndsWith,
}

impl<'a, R: AttributeResolver, B: QueryBackend> PredicateBuilder<'a, R, B> {
    pub fn new(resolver: &'a R, backend: &'a mut B) -> Self {
        Self {
            resolver,
            backend,
            join: None,
            trace: None,
        }
    }

    /// Build the predicate for `path pr`.
    pub fn present(&mut self, path: &str) -> Result<CompiledFilter<B::Predicate>, CompileError> {
        let Some(attr) = self.resolve(path)? else {
            return Ok(CompiledFilter::Unsupported);
        };

        let predicate = if attr.is_primary {
            let field = self.backend.root_field(&attr.storage_name);
            self.backend.is_not_null(field)
        } else {
            let join = self.join_handle();
            let value = self.backend.join_value(&join);
            let not_null = self.backend.is_not_null(value);
            self.constrain_satellite(&attr, not_null)
        };

        Ok(CompiledFilter::Valid(predicate))
    }

    /// Build the predicate for `path op literal`.
    pub fn compare(
        &mut self,
        path: &str,
        op: FilterOp,
        literal: &Literal,
    ) -> Result<CompiledFilter<B::Predicate>, CompileError> {
        let Some(attr) = self.resolve(path)? else {
            return Ok(CompiledFilter::Unsupported);
        };

        let predicate = match op {
            FilterOp::Co => self.pattern_predicate(&attr, literal, TextMatch::Contains)?,
            FilterOp::Sw => self.pattern_predicate(&attr, literal, TextMatch::StartsWith)?,
            FilterOp::Ew => self.pattern_predicate(&attr, literal, TextMatch::EndsWith)?,
            FilterOp::Eq => self.compare_predicate(&attr, CompareOp::Eq, literal)?,
            FilterOp::Ne => self.compare_predicate(&attr, CompareOp::Ne, literal)?,
            FilterOp::Gt => self.compare_predicate(&attr, CompareOp::Gt, literal)?,
            FilterOp::Ge => self.compare_predicate(&attr, CompareOp::Gte, literal)?,
            FilterOp::Lt => self.compare_predicate(&attr, CompareOp::Lt, literal)?,
            FilterOp::Le => self.compare_predicate(&attr, CompareOp::Lte, literal)?,
        };

        Ok(CompiledFilter::Valid(predicate))
    }

    fn compare_predicate(
        &mut self,
        attr: &AttributeDescriptor,
        op: CompareOp,
        literal: &Literal,
    ) -> Result<B::Predicate, CompileError> {
        let value = coerce_literal(attr, op, literal)?;
        let expr = self.value_expr(attr);
        let compare = self.backend.compare(expr, op, value);

        Ok(self.constrain_satellite(attr, compare))
    }

    fn pattern_predicate(
        &mut self,
        attr: &AttributeDescriptor,
        literal: &Literal,
        shape: TextMatch,
    ) -> Result<B::Predicate, CompileError> {
        // Pattern operators take the raw-text path for every value kind:
        // timestamps and booleans are deliberately not coerced here, an
        // accepted limitation inherited from the filter semantics.
        let Some(text) = literal.as_text() else {
            return Err(CompileError::MalformedLiteral {
                literal: "null".to_string(),
                expected: "a string literal for co/sw/ew",
            });
        };

        let escaped = coercion::escape_like(text);
        let pattern = match shape {
            TextMatch::Contains => format!("%{escaped}%"),
            TextMatch::StartsWith => format!("{escaped}%"),
            TextMatch::EndsWith => format!("%{escaped}"),
        };

        let expr = self.value_expr(attr);
        let like = self.backend.like(expr, pattern);

        Ok(self.constrain_satellite(attr, like))
    }

    /// Effective comparison target: the primary column, or the satellite
    /// join's value column.
    fn value_expr(&mut self, attr: &AttributeDescriptor) -> B::Expr {
        if attr.is_primary {
            self.backend.root_field(&attr.storage_name)
        } else {
            let join = self.join_handle();
            self.backend.join_value(&join)
        }
    }

    /// For satellite attributes, conjoin `join.name = storage_name` onto
    /// the predicate; primary attributes pass through unchanged.
    fn constrain_satellite(
        &mut self,
        attr: &AttributeDescriptor,
        predicate: B::Predicate,
    ) -> B::Predicate {
        if attr.is_primary {
            return predicate;
        }

        let join = self.join_handle();
        let name = self.backend.join_name(&join);
        let name_eq = self.backend.compare(
            name,
            CompareOp::Eq,
            ScalarValue::Text(attr.storage_name.clone()),
        );

        self.backend.conjoin(name_eq, predicate)
    }

    fn join_handle(&mut self) -> B::JoinHandle {
        let created = self.join.is_none();
        let handle = self
            .join
            .get_or_insert_with(|| self.backend.attribute_join())
            .clone();

        if created {
            if let Some(trace) = self.trace {
                trace.on_event(CompileTraceEvent::AttributeJoinCreated);
            }
        }

        handle
    }

    fn resolve(&mut self, path: &str) -> Result<Option<AttributeDescriptor>, CompileError> {
        let resolved = self.resolver.resolve(path)?;

        if let Some(trace) = self.trace {
            match &resolved {
                Some(attr) => trace.on_event(CompileTraceEvent::AttributeResolved {
                    path,
                    is_primary: attr.is_primary,
                }),
                None => trace.on_event(CompileTraceEvent::AttributeUnsupported { path }),
            }
        }

        Ok(resolved)
    }
}

/// Coerce a comparison literal per the attribute's value kind.
///
/// Timestamps coerce for all ordering/equality operators; booleans only
/// for `eq`/`ne` (ordering a boolean falls through to the text path).
/// Null literals bypass coercion and compare against SQL NULL.
fn coerce_literal(
    attr: &AttributeDescriptor,
    op: CompareOp,
    literal: &Literal,
) -> Result<ScalarValue, CompileError> {
    let Some(text) = literal.as_text() else {
        return Ok(ScalarValue::Null);
    };

    match attr.value_kind {
        ValueKind::Timestamp => {
            coercion::parse_timestamp_millis(text).map(ScalarValue::TimestampMillis)
        }
        ValueKind::Bool if matches!(op, CompareOp::Eq | CompareOp::Ne) => {
            Ok(ScalarValue::Bool(coercion::parse_boolean(text)))
        }
        _ => Ok(ScalarValue::Text(text.to_string())),
    }
}
