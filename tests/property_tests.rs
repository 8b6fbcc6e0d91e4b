use proptest::prelude::*;
use sigma_match::{parse_rule, LogEntry, MatchOptions, SearchAtom};

const RULE: &str = r#"
title: Property rule
detection:
  keywords:
    - needle
  selection_user:
    User|startswith: adm
  selection_net:
    Ip|cidr: 10.0.0.0/8
  filter:
    Host|endswith: .internal
  condition: (keywords or all of selection_*) and not filter
"#;

fn entry() -> impl Strategy<Value = LogEntry> {
    (
        prop::sample::select(vec!["", "a needle here", "haystack"]),
        prop::sample::select(vec!["admin", "adm", "user", "ADMIN"]),
        prop::sample::select(vec!["10.2.3.4", "11.2.3.4", "fe80::1", "junk"]),
        prop::sample::select(vec!["db.internal", "db.example.com", ""]),
    )
        .prop_map(|(message, user, ip, host)| {
            LogEntry::new(message)
                .with_field("User", user)
                .with_field("Ip", ip)
                .with_field("Host", host)
        })
}

fn atom(field: Option<&str>, modifiers: &[&str], patterns: &[&str]) -> SearchAtom {
    SearchAtom::new(
        field.map(str::to_string),
        modifiers,
        patterns.iter().map(|p| p.to_string()).collect(),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn parsing_is_deterministic(entry in entry()) {
        let options = MatchOptions::default();
        let first = parse_rule(RULE).unwrap();
        let second = parse_rule(RULE).unwrap();
        prop_assert_eq!(first.matches(&entry, &options), second.matches(&entry, &options));
    }

    #[test]
    fn evaluation_is_repeatable(entry in entry()) {
        let options = MatchOptions::default();
        let rule = parse_rule(RULE).unwrap();
        let cold = rule.matches(&entry, &options);
        let warm = rule.matches(&entry, &options);
        prop_assert_eq!(cold, warm);
    }

    #[test]
    fn compiled_matchers_agree(value in "[a-z0-9./-]{0,16}") {
        let options = MatchOptions::default();
        let entry = LogEntry::new(value.clone()).with_field("F", value);
        let one = atom(Some("F"), &["contains"], &["a*b", "c"]);
        let two = atom(Some("F"), &["contains"], &["a*b", "c"]);
        prop_assert_eq!(one.matches(&entry, &options), two.matches(&entry, &options));
    }

    #[test]
    fn contains_is_substring(prefix in "[a-z]{0,6}", suffix in "[a-z]{0,6}") {
        let options = MatchOptions::default();
        let entry = LogEntry::default().with_field("F", format!("{prefix}xyz{suffix}"));
        prop_assert!(atom(Some("F"), &["contains"], &["xyz"]).matches(&entry, &options));
    }

    #[test]
    fn cidr_matches_any_address_in_network(b in 0u8..=255, c in 0u8..=255, d in 0u8..=255) {
        let options = MatchOptions::default();
        let inside = LogEntry::default().with_field("Ip", format!("10.{b}.{c}.{d}"));
        let outside = LogEntry::default().with_field("Ip", format!("11.{b}.{c}.{d}"));
        let cidr = atom(Some("Ip"), &["cidr"], &["10.0.0.0/8"]);
        prop_assert!(cidr.matches(&inside, &options));
        prop_assert!(!cidr.matches(&outside, &options));
    }

    #[test]
    fn expand_without_values_never_matches(value in "\\PC{0,16}") {
        let entry = LogEntry::new(value.clone()).with_field("F", value);
        let expand = atom(Some("F"), &["expand", "contains"], &["%names%"]);
        prop_assert!(!expand.matches(&entry, &MatchOptions::default()));
        prop_assert!(!expand.matches(
            &entry,
            &MatchOptions::new().with_placeholder("other", [""])
        ));
    }
}

#[test]
fn changing_any_part_of_the_atom_changes_behavior() {
    let options = MatchOptions::default();
    let base = atom(Some("F"), &["startswith"], &["abc"]);

    // (atom, input that tells it apart from `base`)
    let variants = [
        (atom(Some("G"), &["startswith"], &["abc"]), LogEntry::default().with_field("G", "abcd")),
        (atom(Some("F"), &["endswith"], &["abc"]), LogEntry::default().with_field("F", "xabc")),
        (atom(Some("F"), &["startswith"], &["abd"]), LogEntry::default().with_field("F", "abdx")),
        (atom(None, &["startswith"], &["abc"]), LogEntry::new("xabcx")),
    ];

    for (variant, entry) in &variants {
        assert_ne!(
            base.matches(entry, &options),
            variant.matches(entry, &options),
            "{} vs {}",
            base.describe(),
            variant.describe()
        );
    }
}

#[test]
fn expand_cache_follows_placeholder_values() {
    let atom = atom(Some("User"), &["expand"], &["%admins%"]);
    let entry = LogEntry::default().with_field("User", "root");

    let root = MatchOptions::new().with_placeholder("admins", ["root"]);
    let admin = MatchOptions::new().with_placeholder("admins", ["admin"]);

    assert!(atom.matches(&entry, &root));
    assert!(!atom.matches(&entry, &admin));
    assert!(atom.matches(&entry, &root));
}
