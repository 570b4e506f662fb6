//! tlsident-lib: TLS server identity verification.
//!
//! Decides whether a peer certificate's identities (subjectAltName DNS and IP
//! entries, falling back to the subject Common Name) authorize it to represent
//! a connection hostname. Matching follows RFC 6125 with the OpenSSL-compatible
//! restrictions on wildcards, label counts and IDNA labels.
//!
//! The certificate arrives already decoded; X.509 parsing and chain
//! validation happen elsewhere.

mod altnames;
mod display;
mod fields;
mod hostname;
mod identity;
mod ip;
mod matcher;

pub use altnames::{parse_alt_names, split_alt_names, split_escaped_alt_names, ParsedAltNames};
pub use display::{display_text, to_json};
pub use fields::{CommonName, PeerCertificate, Subject};
pub use hostname::{split_host, unfqdn, NormalizedHost};
pub use identity::{
    check_server_identity, check_server_identity_with_options, IdentityMismatch,
    IdentityOptions, Verification,
};
pub use ip::{canonicalize_ip, is_ip, IpCanonicalizer, StdIpCanonicalizer};
pub use matcher::check;

/// Error code carried by [`IdentityError::AltNameInvalid`].
pub(crate) const ALTNAME_INVALID_CODE: &str = "ERR_TLS_CERT_ALTNAME_INVALID";

/// Errors returned by tlsident-lib.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// A quoted subjectAltName entry is not a well-formed JSON string literal.
    #[error("Invalid subject alternative name string")]
    AltNameFormat,

    /// The certificate does not cover the requested host.
    #[error("Hostname/IP does not match certificate's altnames: {reason}")]
    AltNameInvalid {
        reason: String,
        host: String,
        cert: Box<PeerCertificate>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IdentityError {
    /// Node-compatible error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            IdentityError::AltNameFormat => "ERR_TLS_CERT_ALTNAME_FORMAT",
            IdentityError::AltNameInvalid { .. } => ALTNAME_INVALID_CODE,
            IdentityError::Json(_) => "ERR_INVALID_JSON",
        }
    }
}
