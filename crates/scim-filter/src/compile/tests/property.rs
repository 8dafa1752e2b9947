//! Property tests for LIKE-pattern escaping, checked against a small
//! reference interpreter for SQL LIKE with an escape character.

use crate::compile::coercion::escape_like;
use proptest::prelude::*;

#[derive(Clone, Copy, PartialEq)]
enum Tok {
    AnyRun,
    AnyOne,
    Lit(char),
}

fn tokens(pattern: &str) -> Vec<Tok> {
    let mut out = Vec::new();
    let mut chars = pattern.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(Tok::Lit(escaped));
                }
            }
            '%' => out.push(Tok::AnyRun),
            '_' => out.push(Tok::AnyOne),
            other => out.push(Tok::Lit(other)),
        }
    }

    out
}

fn match_from(toks: &[Tok], input: &[char]) -> bool {
    match toks.first() {
        None => input.is_empty(),
        Some(Tok::AnyRun) => (0..=input.len()).any(|i| match_from(&toks[1..], &input[i..])),
        Some(Tok::AnyOne) => !input.is_empty() && match_from(&toks[1..], &input[1..]),
        Some(Tok::Lit(c)) => input.first() == Some(c) && match_from(&toks[1..], &input[1..]),
    }
}

fn like_matches(pattern: &str, input: &str) -> bool {
    let input: Vec<char> = input.chars().collect();
    match_from(&tokens(pattern), &input)
}

proptest! {
    /// An escaped value, used as a whole pattern, matches exactly itself.
    #[test]
    fn escaped_value_matches_only_itself(s in "[a-z%_\\\\]{0,12}") {
        let pattern = escape_like(&s);

        prop_assert!(like_matches(&pattern, &s));
        let suffixed = format!("{s}x");
        let prefixed = format!("x{s}");
        prop_assert!(!like_matches(&pattern, &suffixed));
        prop_assert!(!like_matches(&pattern, &prefixed));
    }

    /// A contains-pattern built from an escaped value matches any
    /// superstring of the value.
    #[test]
    fn contains_pattern_matches_superstrings(s in "[a-z%_\\\\]{0,12}") {
        let pattern = format!("%{}%", escape_like(&s));

        let surrounded = format!("pre{s}post");
        prop_assert!(like_matches(&pattern, &surrounded));
        prop_assert!(like_matches(&pattern, &s));
    }
}

#[test]
fn escaped_wildcards_do_not_act_as_wildcards() {
    let pattern = format!("%{}%", escape_like("a%b"));
    assert!(like_matches(&pattern, "xa%bx"));
    assert!(!like_matches(&pattern, "aXb"));

    let pattern = format!("%{}%", escape_like("a_b"));
    assert!(like_matches(&pattern, "a_b"));
    assert!(!like_matches(&pattern, "aXb"));
}

#[test]
fn reference_interpreter_handles_wildcards() {
    assert!(like_matches("%abc%", "xxabcyy"));
    assert!(like_matches("a_c", "abc"));
    assert!(!like_matches("a_c", "ac"));
    assert!(like_matches("abc%", "abcdef"));
    assert!(!like_matches("abc%", "zabc"));
}
