//! IP literal detection and canonical text form.
//!
//! These are the hooks the verifier needs from the surrounding TLS stack. The
//! default implementation uses `std::net` parsing; an embedder with its own
//! notion of IP literals can supply another [`IpCanonicalizer`].

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// IP-literal collaborator used by the identity verifier.
pub trait IpCanonicalizer {
    /// IP version of `host` if it is a textual IPv4/IPv6 literal (IPv6
    /// optionally with a `%zone` suffix), else 0.
    fn ip_version(&self, host: &str) -> u8;

    /// Canonical text for `ip`, such that equal addresses written differently
    /// (compressed vs. expanded IPv6, hex digit case) compare equal.
    /// Returns `None` if `ip` is not an address.
    fn canonicalize(&self, ip: &str) -> Option<String>;
}

/// [`IpCanonicalizer`] backed by the standard library parsers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdIpCanonicalizer;

impl IpCanonicalizer for StdIpCanonicalizer {
    fn ip_version(&self, host: &str) -> u8 {
        is_ip(host)
    }

    fn canonicalize(&self, ip: &str) -> Option<String> {
        canonicalize_ip(ip)
    }
}

/// Returns 4 or 6 if `host` is an IPv4 or IPv6 literal, 0 otherwise.
///
/// IPv6 literals may carry a zone ID (`fe80::1%eth0`).
pub fn is_ip(host: &str) -> u8 {
    if host.parse::<Ipv4Addr>().is_ok() {
        4
    } else if parse_scoped_ipv6(host).is_some() {
        6
    } else {
        0
    }
}

/// Canonical RFC 5952 text for an IP literal (lower-case, compressed IPv6).
///
/// A zone ID is kept verbatim after the `%`, so a scoped host never equals an
/// unscoped subjectAltName address.
pub fn canonicalize_ip(ip: &str) -> Option<String> {
    if let Ok(addr) = ip.parse::<IpAddr>() {
        return Some(addr.to_string());
    }
    let (addr, zone) = parse_scoped_ipv6(ip)?;
    Some(match zone {
        Some(zone) => format!("{}%{}", addr, zone),
        None => addr.to_string(),
    })
}

/// Split an IPv6 literal from its optional zone ID.
fn parse_scoped_ipv6(s: &str) -> Option<(Ipv6Addr, Option<&str>)> {
    let (addr, zone) = match s.split_once('%') {
        Some((addr, zone)) => (addr, Some(zone)),
        None => (s, None),
    };
    if let Some(zone) = zone {
        let valid_zone = !zone.is_empty()
            && zone
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | ':'));
        if !valid_zone {
            return None;
        }
    }
    Some((addr.parse().ok()?, zone))
}
