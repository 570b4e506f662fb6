//! Human-readable and JSON formatting of verification outcomes.

use serde::Serialize;

use crate::identity::Verification;
use crate::{IdentityError, ALTNAME_INVALID_CODE};

/// Serializable summary of a [`Verification`].
#[derive(Debug, Serialize)]
struct Report<'a> {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

impl<'a> From<&'a Verification<'_>> for Report<'a> {
    fn from(outcome: &'a Verification<'_>) -> Self {
        match outcome.mismatch() {
            None => Report {
                valid: true,
                host: None,
                reason: None,
                code: None,
            },
            Some(mismatch) => Report {
                valid: false,
                host: Some(mismatch.host.as_str()),
                reason: Some(mismatch.reason.as_str()),
                code: Some(ALTNAME_INVALID_CODE),
            },
        }
    }
}

/// Format an outcome as `OK` or `FAIL, <reason>`.
pub fn display_text(outcome: &Verification<'_>) -> String {
    match outcome.mismatch() {
        None => "OK".to_string(),
        Some(mismatch) => format!("FAIL, {}", mismatch.reason),
    }
}

/// Serialize an outcome to pretty-printed JSON.
pub fn to_json(outcome: &Verification<'_>) -> Result<String, IdentityError> {
    Ok(serde_json::to_string_pretty(&Report::from(outcome))?)
}
