use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use sigma_match::{parse_condition, Expr, LogEntry, MatchOptions, ParseError, SearchAtom};
use std::collections::BTreeMap;

/// Identifier `name` matches when field `name` equals "1"
fn identifiers(names: &[&str]) -> BTreeMap<String, Expr> {
    names
        .iter()
        .map(|name| {
            let atom = SearchAtom::new(Some(name.to_string()), &[] as &[&str], vec!["1".to_string()])
                .unwrap();
            (name.to_string(), Expr::named(*name, atom.into()))
        })
        .collect()
}

fn entry(set: &[(&str, bool)]) -> LogEntry {
    set.iter().fold(LogEntry::default(), |entry, (name, on)| {
        entry.with_field(*name, if *on { "1" } else { "0" })
    })
}

fn eval(condition: &str, names: &[&str], set: &[(&str, bool)]) -> bool {
    parse_condition(condition, &identifiers(names))
        .unwrap()
        .matches(&entry(set), &MatchOptions::default())
}

#[rstest]
#[case("a and b or c", "(a and b) or c")]
#[case("a or b and c", "a or (b and c)")]
#[case("(a or b) and c", "(a or b) and c")]
#[case("not a and b", "not a and b")]
#[case("not (a and b)", "not (a and b)")]
#[case("a and b and c", "a and b and c")]
#[case("((a))", "a")]
fn test_describe_shape(#[case] condition: &str, #[case] described: &str) {
    let expr = parse_condition(condition, &identifiers(&["a", "b", "c"])).unwrap();
    assert_eq!(expr.describe(), described);
}

#[test]
fn test_chains_flatten() {
    let expr = parse_condition("a or b or c", &identifiers(&["a", "b", "c"])).unwrap();
    match expr {
        Expr::Or(children) => assert_eq!(children.len(), 3),
        other => panic!("expected a flat or, got {other:?}"),
    }
}

#[test]
fn test_and_binds_tighter_than_or() {
    let names = ["a", "b", "c"];
    assert!(eval("a and b or c", &names, &[("a", false), ("b", true), ("c", true)]));
    assert!(eval("c or a and b", &names, &[("a", true), ("b", false), ("c", true)]));
    assert!(!eval("a and b or c", &names, &[("a", true), ("b", false), ("c", false)]));
}

#[test]
fn test_quantifier_expands_in_name_order() {
    let expr = parse_condition("all of sel*", &identifiers(&["sel_b", "sel_a", "filter"])).unwrap();
    assert_eq!(expr.identifiers(), vec!["sel_a", "sel_b"]);
}

#[test]
fn test_quantifier_single_match_is_the_identifier() {
    let expr = parse_condition("1 of filter*", &identifiers(&["sel", "filter"])).unwrap();
    assert_eq!(expr.describe(), "filter");
}

#[test]
fn test_quantifier_pattern_is_literal_except_star() {
    let names = ["sel?", "sel1", "sel[1]"];
    let expr = parse_condition("1 of sel?", &identifiers(&names)).unwrap();
    assert_eq!(expr.identifiers(), vec!["sel?"]);

    let expr = parse_condition("1 of sel[1]", &identifiers(&names)).unwrap();
    assert_eq!(expr.identifiers(), vec!["sel[1]"]);

    assert!(matches!(
        parse_condition("1 of SEL*", &identifiers(&names)),
        Err(ParseError::NoMatchingIdentifiers { .. })
    ));
}

#[rstest]
#[case("", ParseError::EmptyCondition)]
#[case("a and", ParseError::UnexpectedEof)]
#[case("not", ParseError::UnexpectedEof)]
#[case("1 of", ParseError::UnexpectedEof)]
#[case("(a", ParseError::UnmatchedParenthesis { position: 0 })]
#[case("a)", ParseError::UnmatchedParenthesis { position: 1 })]
#[case("a b", ParseError::UnexpectedToken { token: "b".to_string(), position: 2 })]
#[case("a and or b", ParseError::UnexpectedToken { token: "or".to_string(), position: 6 })]
#[case("zzz", ParseError::MissingConditionItem { key: "zzz".to_string() })]
#[case("1 of x_*", ParseError::NoMatchingIdentifiers { pattern: "x_*".to_string() })]
#[case("a | count() > 1", ParseError::AggregationUnsupported { position: 2 })]
#[case("(a or b | count())", ParseError::AggregationUnsupported { position: 8 })]
#[case("a and | b", ParseError::UnexpectedToken { token: "|".to_string(), position: 6 })]
#[case("zzz | count()", ParseError::MissingConditionItem { key: "zzz".to_string() })]
#[case("1 of (a)", ParseError::UnexpectedToken { token: "(".to_string(), position: 5 })]
fn test_errors(#[case] condition: &str, #[case] expected: ParseError) {
    assert_eq!(parse_condition(condition, &identifiers(&["a", "b"])), Err(expected));
}

#[test]
fn test_wildcard_outside_quantifier_is_a_plain_name() {
    assert_eq!(
        parse_condition("sel*", &identifiers(&["sel"])),
        Err(ParseError::MissingConditionItem { key: "sel*".to_string() })
    );
}

#[test]
fn test_deep_nesting_is_limited() {
    let condition = format!("{}a{}", "(".repeat(200), ")".repeat(200));
    assert!(matches!(
        parse_condition(&condition, &identifiers(&["a"])),
        Err(ParseError::RecursionLimitExceeded { .. })
    ));

    let condition = format!("{}a", "not ".repeat(200));
    assert!(matches!(
        parse_condition(&condition, &identifiers(&["a"])),
        Err(ParseError::RecursionLimitExceeded { .. })
    ));
}

proptest! {
    #[test]
    fn one_of_them_is_or(a in any::<bool>(), b in any::<bool>()) {
        let names = ["A", "B"];
        let set = [("A", a), ("B", b)];
        prop_assert_eq!(eval("1 of them", &names, &set), eval("A or B", &names, &set));
        prop_assert_eq!(eval("1 of them", &names, &set), a || b);
    }

    #[test]
    fn all_of_them_is_and(a in any::<bool>(), b in any::<bool>()) {
        let names = ["A", "B"];
        let set = [("A", a), ("B", b)];
        prop_assert_eq!(eval("all of them", &names, &set), eval("A and B", &names, &set));
        prop_assert_eq!(eval("all of them", &names, &set), a && b);
    }

    #[test]
    fn de_morgan(a in any::<bool>(), b in any::<bool>()) {
        let names = ["A", "B"];
        let set = [("A", a), ("B", b)];
        prop_assert_eq!(
            eval("not (A or B)", &names, &set),
            eval("not A and not B", &names, &set)
        );
    }

    #[test]
    fn parsing_arbitrary_text_never_panics(condition in "[a-c()| ]{0,24}|(not |and |or |1 of |all of )*[abc]") {
        let _ = parse_condition(&condition, &identifiers(&["a", "b", "c"]));
    }
}
