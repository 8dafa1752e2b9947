use crate::filter::{
    Filter, FilterNode, FilterOp, Literal, MAX_NESTING_DEPTH, ParseError, parse_filter,
};

fn parse(input: &str) -> FilterNode {
    parse_filter(input).expect("filter should parse").root
}

#[test]
fn simple_equality() {
    let node = parse("userName eq \"john\"");

    assert_eq!(
        node,
        FilterNode::Compare {
            path: "userName".to_string(),
            op: FilterOp::Eq,
            literal: Literal::Str("john".to_string()),
        }
    );
}

#[test]
fn operators_are_case_insensitive() {
    for input in [
        "userName EQ \"john\"",
        "userName eq \"john\"",
        "userName Eq \"john\"",
    ] {
        assert!(parse_filter(input).is_ok(), "failed to parse: {input}");
    }

    for op in ["NE", "CO", "SW", "EW"] {
        assert!(parse_filter(&format!("userName {op} \"john\"")).is_ok());
    }
    for op in ["GT", "GE", "LT", "LE"] {
        assert!(parse_filter(&format!("age {op} 30")).is_ok());
    }
    assert!(parse_filter("userName PR").is_ok());
}

#[test]
fn keywords_are_case_insensitive() {
    assert!(parse_filter("userName eq \"john\" AND active eq true").is_ok());
    assert!(parse_filter("userName eq \"john\" OR userName eq \"jane\"").is_ok());
    assert!(parse_filter("NOT (userName eq \"john\")").is_ok());
}

#[test]
fn and_binds_tighter_than_or() {
    let node = parse("a pr or b pr and c pr");

    let FilterNode::Or(left, right) = node else {
        panic!("expected top-level OR");
    };
    assert_eq!(*left, FilterNode::Present { path: "a".to_string() });
    assert!(matches!(*right, FilterNode::And(_, _)));
}

#[test]
fn grouping_overrides_precedence() {
    let node = parse("(a pr or b pr) and c pr");

    let FilterNode::And(left, right) = node else {
        panic!("expected top-level AND");
    };
    let FilterNode::Group(grouped) = *left else {
        panic!("expected grouped left side");
    };
    assert!(matches!(*grouped, FilterNode::Or(_, _)));
    assert_eq!(*right, FilterNode::Present { path: "c".to_string() });
}

#[test]
fn not_applies_to_the_following_atom() {
    let node = parse("not (a pr)");

    let FilterNode::Not(inner) = node else {
        panic!("expected NOT");
    };
    assert!(matches!(*inner, FilterNode::Group(_)));
}

#[test]
fn string_escapes_resolve() {
    let node = parse(r#"a eq "quote:\" slash:\\ tab:\t""#);

    assert_eq!(
        node,
        FilterNode::Compare {
            path: "a".to_string(),
            op: FilterOp::Eq,
            literal: Literal::Str("quote:\" slash:\\ tab:\t".to_string()),
        }
    );
}

#[test]
fn unicode_escapes_resolve() {
    let node = parse(r#"a eq "\u0041\u00e9""#);
    assert!(matches!(
        node,
        FilterNode::Compare { literal: Literal::Str(s), .. } if s == "Aé"
    ));

    // Surrogate pair.
    let node = parse(r#"a eq "\uD83D\uDE00""#);
    assert!(matches!(
        node,
        FilterNode::Compare { literal: Literal::Str(s), .. } if s == "\u{1F600}"
    ));
}

#[test]
fn lone_surrogate_is_rejected() {
    let err = parse_filter(r#"a eq "\uD83D""#).unwrap_err();

    assert!(matches!(err, ParseError::InvalidEscape { .. }));
}

#[test]
fn literal_kinds() {
    assert!(matches!(
        parse("a eq true"),
        FilterNode::Compare { literal: Literal::Bool(true), .. }
    ));
    assert!(matches!(
        parse("a eq false"),
        FilterNode::Compare { literal: Literal::Bool(false), .. }
    ));
    assert!(matches!(
        parse("a eq null"),
        FilterNode::Compare { literal: Literal::Null, .. }
    ));
    assert!(matches!(
        parse("age gt 30"),
        FilterNode::Compare { literal: Literal::Number(n), .. } if n == "30"
    ));
    assert!(matches!(
        parse("score ge -1.5"),
        FilterNode::Compare { literal: Literal::Number(n), .. } if n == "-1.5"
    ));
}

#[test]
fn empty_filter_is_rejected() {
    assert!(matches!(parse_filter(""), Err(ParseError::Empty)));
    assert!(matches!(parse_filter("   "), Err(ParseError::Empty)));
}

#[test]
fn unterminated_string_is_rejected() {
    let err = parse_filter("userName eq \"john").unwrap_err();

    assert!(matches!(err, ParseError::UnterminatedString));
}

#[test]
fn unknown_operator_is_rejected() {
    let err = parse_filter("userName xx \"john\"").unwrap_err();

    assert!(matches!(err, ParseError::UnknownOperator { token } if token == "xx"));
}

#[test]
fn bare_word_literal_is_rejected() {
    let err = parse_filter("userName eq john").unwrap_err();

    assert!(matches!(err, ParseError::UnexpectedToken { token } if token == "john"));
}

#[test]
fn trailing_input_is_rejected() {
    let err = parse_filter("a pr b pr").unwrap_err();

    assert!(matches!(err, ParseError::TrailingInput { .. }));
}

#[test]
fn missing_close_paren_is_rejected() {
    let err = parse_filter("(a pr").unwrap_err();

    assert!(matches!(err, ParseError::UnexpectedEnd));
}

#[test]
fn nesting_depth_is_bounded() {
    let depth = (MAX_NESTING_DEPTH + 1) as usize;
    let input = format!("{}a pr{}", "(".repeat(depth), ")".repeat(depth));

    let err = parse_filter(&input).unwrap_err();

    assert!(matches!(err, ParseError::DepthExceeded { limit } if limit == MAX_NESTING_DEPTH));
}

#[test]
fn filter_root_round_trips_through_the_ast() {
    let filter = parse_filter("a pr and b pr").unwrap();

    assert_eq!(
        filter,
        Filter {
            root: FilterNode::And(
                Box::new(FilterNode::Present { path: "a".to_string() }),
                Box::new(FilterNode::Present { path: "b".to_string() }),
            ),
        }
    );
}
