//! Compilation tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect
//! compilation semantics.

///
/// CompileTraceSink
///

pub trait CompileTraceSink: Send + Sync {
    fn on_event(&self, event: CompileTraceEvent<'_>);
}

///
/// CompileTraceEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompileTraceEvent<'a> {
    AttributeResolved { path: &'a str, is_primary: bool },
    AttributeUnsupported { path: &'a str },
    AttributeJoinCreated,
}
