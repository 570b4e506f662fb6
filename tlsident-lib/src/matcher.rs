//! Matching of hostname labels against a single certificate name pattern.

use crate::hostname::split_host;

/// Check whether `host_labels` (already normalized with [`split_host`]) match
/// the certificate name `pattern`.
///
/// Rules, mirroring OpenSSL and RFC 6125 Section 6.4.3:
/// - the pattern must have exactly as many labels as the host
/// - empty labels and anything outside printable ASCII reject the pattern
/// - all labels but the leftmost must be equal
/// - the leftmost label may hold a single `*`, only when `wildcards` is set,
///   never in a label containing `xn--`, and never in a two-label pattern
///   (`*.com`)
/// - `*` stands for zero or more characters within one label
pub fn check<S: AsRef<str>>(host_labels: &[S], pattern: &str, wildcards: bool) -> bool {
    if pattern.is_empty() {
        return false;
    }

    let pattern_labels = split_host(pattern);

    if host_labels.len() != pattern_labels.len() {
        return false;
    }

    // e.g. "bad..example.com"
    if pattern_labels.iter().any(String::is_empty) {
        return false;
    }

    // U-labels, blanks and control characters are never accepted.
    if pattern_labels.iter().any(|label| !is_printable_ascii(label)) {
        return false;
    }

    for (host, pat) in host_labels.iter().zip(&pattern_labels).skip(1).rev() {
        if host.as_ref() != pat.as_str() {
            return false;
        }
    }

    let (Some(host_subdomain), Some(pattern_subdomain)) =
        (host_labels.first(), pattern_labels.first())
    else {
        return false;
    };
    let host_subdomain = host_subdomain.as_ref();

    // A-labels (Punycode) are compared verbatim, even if they contain '*'.
    let Some((prefix, suffix)) = pattern_subdomain.split_once('*') else {
        return host_subdomain == pattern_subdomain;
    };
    if pattern_subdomain.contains("xn--") {
        return host_subdomain == pattern_subdomain;
    }

    if !wildcards {
        return false;
    }

    if suffix.contains('*') {
        return false;
    }

    // *.tld
    if pattern_labels.len() <= 2 {
        return false;
    }

    if prefix.len() + suffix.len() > host_subdomain.len() {
        return false;
    }

    host_subdomain.starts_with(prefix) && host_subdomain.ends_with(suffix)
}

fn is_printable_ascii(label: &str) -> bool {
    label.chars().all(|c| ('\u{21}'..='\u{7f}').contains(&c))
}
