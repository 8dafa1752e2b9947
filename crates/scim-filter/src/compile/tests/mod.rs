mod property;

use crate::{
    backend::{QueryPredicate, SqlBackend, SqlFilter},
    compile::CompiledFilter,
    compile_filter,
    schema::{AttributeDescriptor, SchemaMap, ValueKind},
};

/// Schema used across the compile tests: a few primary columns of each
/// value kind plus satellite profile attributes.
fn test_schema() -> SchemaMap {
    SchemaMap::new()
        .with("userName", AttributeDescriptor::primary("username", ValueKind::Text))
        .with("active", AttributeDescriptor::primary("enabled", ValueKind::Bool))
        .with(
            "meta.created",
            AttributeDescriptor::primary("created_timestamp", ValueKind::Timestamp),
        )
        .with(
            "name.givenName",
            AttributeDescriptor::satellite("givenName", ValueKind::Text),
        )
        .with("nickName", AttributeDescriptor::satellite("nickName", ValueKind::Text))
        .with("locale", AttributeDescriptor::satellite("locale", ValueKind::Text))
}

fn compile(input: &str) -> (CompiledFilter<QueryPredicate>, SqlBackend) {
    let schema = test_schema();
    let mut backend = SqlBackend::new();
    let compiled =
        compile_filter(input, &schema, &mut backend).expect("filter should compile");

    (compiled, backend)
}

/// Compile and render, surfacing `Unsupported` as the zero-row predicate.
fn sql(input: &str) -> SqlFilter {
    let (compiled, mut backend) = compile(input);

    compiled.or_match_none(&mut backend).to_sql()
}
