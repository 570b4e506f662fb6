//! Server identity verification: does this certificate cover this host?

use crate::altnames::{parse_alt_names, ParsedAltNames};
use crate::fields::PeerCertificate;
use crate::hostname::{split_host, unfqdn};
use crate::ip::{IpCanonicalizer, StdIpCanonicalizer};
use crate::matcher::check;
use crate::IdentityError;

/// Options controlling identity matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityOptions {
    /// Allow a `*` in the leftmost label of DNS names and Common Names.
    pub wildcards: bool,
    /// Match against the subject Common Name when the certificate has no
    /// DNS subjectAltName entries.
    pub cn_fallback: bool,
}

impl Default for IdentityOptions {
    fn default() -> Self {
        Self {
            wildcards: true,
            cn_fallback: true,
        }
    }
}

/// Result of matching a host against a certificate.
#[derive(Debug, Clone, PartialEq)]
pub enum Verification<'a> {
    Valid,
    Invalid(IdentityMismatch<'a>),
}

impl<'a> Verification<'a> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid)
    }

    pub fn mismatch(&self) -> Option<&IdentityMismatch<'a>> {
        match self {
            Verification::Valid => None,
            Verification::Invalid(mismatch) => Some(mismatch),
        }
    }

    /// Turn an `Invalid` outcome into [`IdentityError::AltNameInvalid`].
    pub fn into_result(self) -> Result<(), IdentityError> {
        match self {
            Verification::Valid => Ok(()),
            Verification::Invalid(mismatch) => Err(mismatch.to_error()),
        }
    }
}

/// Why a certificate does not cover a host.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityMismatch<'a> {
    /// Human-readable explanation, suitable for display or logging.
    pub reason: String,
    /// The host as compared, with any trailing root dot removed.
    pub host: String,
    /// The certificate that was checked.
    pub cert: &'a PeerCertificate,
}

impl IdentityMismatch<'_> {
    /// Error for callers that abort the handshake; carries a copy of the
    /// certificate for diagnostics.
    pub fn to_error(&self) -> IdentityError {
        IdentityError::AltNameInvalid {
            reason: self.reason.clone(),
            host: self.host.clone(),
            cert: Box::new(self.cert.clone()),
        }
    }
}

/// Check that `cert` is valid for `hostname`, with wildcards and Common Name
/// fallback enabled.
///
/// 1. An IP literal host must appear among the `IP Address:` SAN entries.
/// 2. Otherwise, if there are `DNS:` SAN entries, one of them must match.
/// 3. Otherwise the subject CN (or one of several CNs) must match.
///
/// A mismatch is returned as [`Verification::Invalid`]. `Err` is reserved for
/// a malformed subjectAltName string ([`IdentityError::AltNameFormat`]).
pub fn check_server_identity<'a>(
    hostname: &str,
    cert: &'a PeerCertificate,
) -> Result<Verification<'a>, IdentityError> {
    check_server_identity_with_options(
        hostname,
        cert,
        &IdentityOptions::default(),
        &StdIpCanonicalizer,
    )
}

/// Like [`check_server_identity`], with explicit options and IP collaborator.
pub fn check_server_identity_with_options<'a, C>(
    hostname: &str,
    cert: &'a PeerCertificate,
    options: &IdentityOptions,
    ip: &C,
) -> Result<Verification<'a>, IdentityError>
where
    C: IpCanonicalizer + ?Sized,
{
    let alt_names = cert.subjectaltname.as_deref().filter(|s| !s.is_empty());
    let parsed = match alt_names {
        Some(raw) => parse_alt_names(raw, ip)?,
        None => ParsedAltNames::default(),
    };

    let host = unfqdn(hostname);
    let reason = match mismatch_reason(host, cert, alt_names, &parsed, options, ip) {
        None => {
            log::debug!("certificate identity matches {}", host);
            return Ok(Verification::Valid);
        }
        Some(reason) => reason,
    };

    log::debug!("certificate identity mismatch: {}", reason);
    Ok(Verification::Invalid(IdentityMismatch {
        reason,
        host: host.to_owned(),
        cert,
    }))
}

/// `None` if the host is covered, otherwise the failure reason.
fn mismatch_reason<C>(
    host: &str,
    cert: &PeerCertificate,
    alt_names: Option<&str>,
    parsed: &ParsedAltNames,
    options: &IdentityOptions,
    ip: &C,
) -> Option<String>
where
    C: IpCanonicalizer + ?Sized,
{
    if ip.ip_version(host) != 0 {
        log::trace!("{} is an IP literal, checking IP Address entries", host);
        let canonical = ip.canonicalize(host);
        if canonical.is_some_and(|addr| parsed.ips.contains(&addr)) {
            return None;
        }
        return Some(format!(
            "IP: {} is not in the cert's list: {}",
            host,
            parsed.ips.join(", ")
        ));
    }

    let common_name = cert
        .subject
        .common_name()
        .filter(|_| options.cn_fallback);

    if !parsed.dns_names.is_empty() {
        log::trace!("checking {} against DNS altnames", host);
        let host_labels = split_host(host);
        if parsed
            .dns_names
            .iter()
            .any(|name| check(&host_labels, name, options.wildcards))
        {
            return None;
        }
        return Some(format!(
            "Host: {}. is not in the cert's altnames: {}",
            host,
            alt_names.unwrap_or_default()
        ));
    }

    if let Some(cn) = common_name {
        log::trace!("no DNS altnames, checking {} against subject CN", host);
        let host_labels = split_host(host);
        if cn
            .names()
            .iter()
            .any(|name| check(&host_labels, name, options.wildcards))
        {
            return None;
        }
        return Some(format!("Host: {}. is not cert's CN: {}", host, cn));
    }

    Some("Cert does not contain a DNS name".to_owned())
}
