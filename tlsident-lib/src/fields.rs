//! Peer certificate data as presented by the TLS layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::IdentityError;

/// The already-decoded fields of a peer certificate.
///
/// Mirrors the object shape of a Node-style `getPeerCertificate()` result so
/// that such documents deserialize directly. Only `subject.CN` and
/// `subjectaltname` are read; every other field is carried in `extra`
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeerCertificate {
    #[serde(default)]
    pub subject: Subject,
    /// OpenSSL-style subjectAltName text, e.g. `DNS:a.com, IP Address:1.2.3.4`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subjectaltname: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PeerCertificate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a certificate document from JSON.
    pub fn from_json(json: &str) -> Result<Self, IdentityError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_subjectaltname(mut self, alt_names: impl Into<String>) -> Self {
        self.subjectaltname = Some(alt_names.into());
        self
    }

    pub fn with_common_name(mut self, cn: impl Into<CommonName>) -> Self {
        self.subject.cn = Some(cn.into());
        self
    }
}

/// Subject distinguished name. Only the Common Name is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(rename = "CN", default, skip_serializing_if = "Option::is_none")]
    pub cn: Option<CommonName>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Subject {
    /// The Common Name, if it is usable as an identity.
    ///
    /// An empty string counts as absent; a list counts as present even when
    /// it is empty.
    pub fn common_name(&self) -> Option<&CommonName> {
        self.cn.as_ref().filter(|cn| match cn {
            CommonName::Single(name) => !name.is_empty(),
            CommonName::Multiple(_) => true,
        })
    }
}

/// A subject Common Name: one value, or several when the attribute repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommonName {
    Single(String),
    Multiple(Vec<String>),
}

impl CommonName {
    pub fn names(&self) -> &[String] {
        match self {
            CommonName::Single(name) => std::slice::from_ref(name),
            CommonName::Multiple(names) => names,
        }
    }
}

impl std::fmt::Display for CommonName {
    /// Repeated values are joined with `,` (no space).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.names().join(","))
    }
}

impl From<&str> for CommonName {
    fn from(name: &str) -> Self {
        CommonName::Single(name.to_owned())
    }
}

impl From<String> for CommonName {
    fn from(name: String) -> Self {
        CommonName::Single(name)
    }
}

impl From<Vec<String>> for CommonName {
    fn from(names: Vec<String>) -> Self {
        CommonName::Multiple(names)
    }
}

impl From<Vec<&str>> for CommonName {
    fn from(names: Vec<&str>) -> Self {
        CommonName::Multiple(names.into_iter().map(str::to_owned).collect())
    }
}
