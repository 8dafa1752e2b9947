use crate::{
    backend::QueryBackend,
    compile::{CompileError, builder::PredicateBuilder, trace::CompileTraceSink},
    filter::{Filter, FilterNode},
    schema::AttributeResolver,
};

/// Maximum parse-tree depth the compiler walks before failing fast.
pub const MAX_COMPILE_DEPTH: u32 = 64;

///
/// CompiledFilter
///
/// Tri-state compilation outcome. `Unsupported` is not "false": it marks
/// a sub-expression referencing an attribute the resolver does not know,
/// and it propagates through combination by absorption rules rather than
/// boolean algebra.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompiledFilter<P> {
    Valid(P),
    Unsupported,
}

impl<P> CompiledFilter<P> {
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported)
    }

    #[must_use]
    pub fn valid(self) -> Option<P> {
        match self {
            Self::Valid(predicate) => Some(predicate),
            Self::Unsupported => None,
        }
    }

    /// Surface a fully-unsupported filter as a predicate matching zero
    /// rows. Per RFC 7644 an unknown attribute denotes the empty result
    /// set, never "everything".
    pub fn or_match_none<B>(self, backend: &mut B) -> P
    where
        B: QueryBackend<Predicate = P>,
    {
        match self {
            Self::Valid(predicate) => predicate,
            Self::Unsupported => backend.match_none(),
        }
    }
}

///
/// FilterCompiler
///
/// Walks a parsed filter tree top-down, delegating leaves to the
/// [`PredicateBuilder`] and combining sub-results with the tri-state
/// rules:
///
/// - `and`: either side `Unsupported` makes the whole AND `Unsupported`
/// - `or`: an `Unsupported` side is dropped; the other side stands alone
/// - `not`: never inverts `Unsupported`
///
/// Synchronous and side-effect-free beyond the builder's memoized join
/// handle; a fresh compiler (or at least a fresh backend/builder pair)
/// is expected per compilation call.
///

pub struct FilterCompiler<'a, R, B: QueryBackend> {
    builder: PredicateBuilder<'a, R, B>,
    max_depth: u32,
}

impl<'a, R: AttributeResolver, B: QueryBackend> FilterCompiler<'a, R, B> {
    pub fn new(resolver: &'a R, backend: &'a mut B) -> Self {
        Self {
            builder: PredicateBuilder::new(resolver, backend),
            max_depth: MAX_COMPILE_DEPTH,
        }
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub const fn with_trace(mut self, sink: &'a dyn CompileTraceSink) -> Self {
        self.builder.trace = Some(sink);
        self
    }

    pub fn compile(
        &mut self,
        filter: &Filter,
    ) -> Result<CompiledFilter<B::Predicate>, CompileError> {
        self.compile_node(&filter.root, 0)
    }

    fn compile_node(
        &mut self,
        node: &FilterNode,
        depth: u32,
    ) -> Result<CompiledFilter<B::Predicate>, CompileError> {
        if depth >= self.max_depth {
            return Err(CompileError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        match node {
            FilterNode::Group(inner) => self.compile_node(inner, depth + 1),

            FilterNode::Present { path } => self.builder.present(path),

            FilterNode::Compare { path, op, literal } => self.builder.compare(path, *op, literal),

            FilterNode::Not(inner) => {
                let result = self.compile_node(inner, depth + 1)?;

                // `not (unknownAttr pr)` still denotes the empty result
                // set; negating an unknown condition does not make it
                // satisfiable.
                Ok(match result {
                    CompiledFilter::Unsupported => CompiledFilter::Unsupported,
                    CompiledFilter::Valid(predicate) => {
                        CompiledFilter::Valid(self.builder.backend.negate(predicate))
                    }
                })
            }

            FilterNode::And(left, right) => {
                // Both branches compile unconditionally so join creation
                // and error classification stay independent of branch
                // order.
                let left = self.compile_node(left, depth + 1)?;
                let right = self.compile_node(right, depth + 1)?;

                Ok(match (left, right) {
                    (CompiledFilter::Valid(l), CompiledFilter::Valid(r)) => {
                        CompiledFilter::Valid(self.builder.backend.conjoin(l, r))
                    }
                    _ => CompiledFilter::Unsupported,
                })
            }

            FilterNode::Or(left, right) => {
                let left = self.compile_node(left, depth + 1)?;
                let right = self.compile_node(right, depth + 1)?;

                Ok(match (left, right) {
                    (CompiledFilter::Valid(l), CompiledFilter::Valid(r)) => {
                        CompiledFilter::Valid(self.builder.backend.disjoin(l, r))
                    }
                    (CompiledFilter::Valid(l), CompiledFilter::Unsupported) => {
                        CompiledFilter::Valid(l)
                    }
                    (CompiledFilter::Unsupported, CompiledFilter::Valid(r)) => {
                        CompiledFilter::Valid(r)
                    }
                    (CompiledFilter::Unsupported, CompiledFilter::Unsupported) => {
                        CompiledFilter::Unsupported
                    }
                })
            }
        }
    }
}
