//! Compiled matchers produced from a search atom's patterns

use crate::pattern::traits::StringMatcher;
use ipnetwork::IpNetwork;
use regex::Regex;
use std::net::IpAddr;

/// A reusable matcher over a single string value
#[derive(Debug)]
pub enum CompiledMatcher {
    /// One alternation covering every pattern; any may match
    Any(Regex),
    /// One regex per pattern; all must match
    All(Vec<Regex>),
    /// Network containment
    Cidr {
        /// Parsed networks, IPv4 and IPv6 mixed
        networks: Vec<IpNetwork>,
        /// Require containment in every network instead of any
        all: bool,
    },
}

impl StringMatcher for CompiledMatcher {
    fn string_match(&self, value: &str) -> bool {
        match self {
            CompiledMatcher::Any(regex) => regex.is_match(value),
            CompiledMatcher::All(regexes) => regexes.iter().all(|r| r.is_match(value)),
            CompiledMatcher::Cidr { networks, all } => {
                let Ok(addr) = value.parse::<IpAddr>() else {
                    return false;
                };
                // IpNetwork::contains is false across address families
                if *all {
                    networks.iter().all(|net| net.contains(addr))
                } else {
                    networks.iter().any(|net| net.contains(addr))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cidr(patterns: &[&str], all: bool) -> CompiledMatcher {
        CompiledMatcher::Cidr {
            networks: patterns.iter().map(|p| p.parse().unwrap()).collect(),
            all,
        }
    }

    #[test]
    fn test_cidr_containment() {
        let matcher = cidr(&["10.0.0.0/8", "192.168.0.0/16"], false);
        assert!(matcher.string_match("10.1.2.3"));
        assert!(matcher.string_match("192.168.7.1"));
        assert!(!matcher.string_match("11.1.2.3"));
        assert!(!matcher.string_match("not an ip"));
        assert!(!matcher.string_match(""));
    }

    #[test]
    fn test_cidr_family_separation() {
        let v4 = cidr(&["0.0.0.0/0"], false);
        assert!(!v4.string_match("::1"));
        let v6 = cidr(&["::/0"], false);
        assert!(!v6.string_match("127.0.0.1"));
        assert!(v6.string_match("fe80::1"));
    }

    #[test]
    fn test_cidr_all() {
        let matcher = cidr(&["10.0.0.0/8", "10.1.0.0/16"], true);
        assert!(matcher.string_match("10.1.2.3"));
        assert!(!matcher.string_match("10.2.2.3"));
    }

    #[test]
    fn test_regex_any_and_all() {
        let any = CompiledMatcher::Any(Regex::new("^(?:a|b)$").unwrap());
        assert!(any.string_match("a"));
        assert!(!any.string_match("c"));

        let all = CompiledMatcher::All(vec![
            Regex::new("foo").unwrap(),
            Regex::new("bar").unwrap(),
        ]);
        assert!(all.string_match("foobar"));
        assert!(!all.string_match("foo"));
    }
}
