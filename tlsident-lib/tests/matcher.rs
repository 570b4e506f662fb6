#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing
)]
//! Tests for matching host labels against a single name pattern.

use tlsident_lib::*;

fn matches(host: &str, pattern: &str) -> bool {
    check(&split_host(host), pattern, true)
}

// =========================================================================
// Exact names
// =========================================================================

#[test]
fn exact_name_matches() {
    assert!(matches("www.example.com", "www.example.com"));
    assert!(check(&["www", "example", "com"], "www.example.com", false));
}

#[test]
fn pattern_is_normalized() {
    assert!(matches("www.example.com", "WWW.Example.COM"));
    assert!(matches("www.example.com", "www.example.com."));
}

#[test]
fn empty_pattern_never_matches() {
    assert!(!check(&[""], "", true));
    assert!(!matches("example.com", ""));
}

#[test]
fn right_labels_must_be_equal() {
    assert!(!matches("www.example.com", "www.example.org"));
    assert!(!matches("www.example.com", "*.example.org"));
    assert!(!matches("www.example.com", "*.other.com"));
}

#[test]
fn empty_pattern_labels_are_rejected() {
    assert!(!check(&["a", "", "com"], "a..com", true));
    assert!(!check(&["", "example", "com"], ".example.com", true));
}

#[test]
fn non_printable_ascii_patterns_are_rejected() {
    assert!(!check(&["bücher", "example", "com"], "bücher.example.com", true));
    assert!(!check(&["a b", "example", "com"], "a b.example.com", true));
    assert!(!check(&["a\tb", "example", "com"], "a\tb.example.com", true));
}

// =========================================================================
// Label counts
// =========================================================================

#[test]
fn wildcard_matches_exactly_one_label() {
    assert!(check(&["foo", "example", "com"], "*.example.com", true));
    assert!(!check(&["example", "com"], "*.example.com", true));
    assert!(!check(&["foo", "bar", "example", "com"], "*.example.com", true));
}

#[test]
fn wildcard_over_tld_is_rejected() {
    for host in [["foo", "com"], ["com", "com"], ["*", "com"], ["x", "org"]] {
        assert!(!check(&host, "*.com", true), "{host:?}");
    }
    assert!(!check(&["foo", "com"], "f*.com", true));
}

// =========================================================================
// Wildcard shapes
// =========================================================================

#[test]
fn partial_wildcards_match_prefix_and_suffix() {
    assert!(matches("foo.example.com", "f*.example.com"));
    assert!(matches("foo.example.com", "*o.example.com"));
    assert!(matches("fao.example.com", "f*o.example.com"));
    assert!(matches("fo.example.com", "f*o.example.com"));
    assert!(matches("bar.example.com", "ba*r.example.com"));
    assert!(!matches("f.example.com", "f*o.example.com"));
    assert!(!matches("bar.example.com", "f*.example.com"));
    assert!(!matches("foo.example.com", "*x.example.com"));
}

#[test]
fn multiple_wildcards_are_rejected() {
    for host in ["foo.example.com", "fo.example.com", "f.example.com", "ff.example.com"] {
        assert!(!matches(host, "f**.example.com"), "{host}");
        assert!(!matches(host, "*o*.example.com"), "{host}");
        assert!(!matches(host, "**.example.com"), "{host}");
    }
}

#[test]
fn wildcards_can_be_disabled() {
    assert!(!check(&["foo", "example", "com"], "*.example.com", false));
    assert!(!check(&["foo", "example", "com"], "f*.example.com", false));
}

#[test]
fn wildcard_only_in_leftmost_label() {
    assert!(!matches("www.foo.example.com", "www.*.example.com"));
    assert!(!matches("www.example.com", "www.example.*"));
}

#[test]
fn a_labels_are_never_wildcards() {
    assert!(!check(&["xn--foo", "com"], "x*.com", true));
    assert!(!matches("xn--abc.example.com", "xn--a*.example.com"));
    assert!(!matches("xn--abc.example.com", "*xn--.example.com"));
    // Compared verbatim instead.
    assert!(check(&["xn--a*", "example", "com"], "xn--a*.example.com", true));
    assert!(matches("xn--bcher-kva.example.com", "xn--bcher-kva.example.com"));
}

#[test]
fn check_is_deterministic() {
    let host = split_host("foo.example.com");
    for pattern in ["*.example.com", "f*.example.com", "*.com", "x.example.com"] {
        assert_eq!(check(&host, pattern, true), check(&host, pattern, true));
    }
}
