//! Splitting and classification of the OpenSSL-style subjectAltName string.
//!
//! The string looks like `DNS:a.com, IP Address:1.2.3.4`. Entries whose value
//! contains the `, ` separator (or other awkward characters) are emitted as
//! JSON string literals, e.g. `DNS:"weird, name"`, so a plain split is only
//! safe when the string has no `"` at all.

use crate::ip::IpCanonicalizer;
use crate::IdentityError;

const SEPARATOR: &str = ", ";
const DNS_PREFIX: &str = "DNS:";
const IP_PREFIX: &str = "IP Address:";

/// DNS and IP identities extracted from a subjectAltName string, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAltNames {
    pub dns_names: Vec<String>,
    /// Canonicalized where possible; unparseable values are kept verbatim.
    pub ips: Vec<String>,
}

/// Split `alt_names` into entries, choosing the escaped-string parser only
/// when the input contains a `"`.
pub fn split_alt_names(alt_names: &str) -> Result<Vec<String>, IdentityError> {
    if alt_names.contains('"') {
        split_escaped_alt_names(alt_names)
    } else {
        Ok(alt_names.split(SEPARATOR).map(str::to_owned).collect())
    }
}

/// Split a subjectAltName string that contains quoted entries.
///
/// Quoted sections are decoded as JSON string literals and may contain the
/// separator. Always yields one more entry than the number of top-level
/// separators, including a trailing empty entry.
///
/// # Errors
///
/// [`IdentityError::AltNameFormat`] if a `"` does not start a well-formed
/// JSON string literal.
pub fn split_escaped_alt_names(alt_names: &str) -> Result<Vec<String>, IdentityError> {
    let mut result = Vec::new();
    let mut current_token = String::new();
    let mut offset = 0;

    while offset < alt_names.len() {
        let rest = alt_names.get(offset..).unwrap_or_default();
        let next_sep = rest.find(SEPARATOR);
        let next_quote = rest.find('"');

        match (next_quote, next_sep) {
            (Some(quote), sep) if sep.map_or(true, |sep| quote < sep) => {
                let (plain, quoted) = rest.split_at(quote);
                current_token.push_str(plain);
                let literal_len =
                    json_string_literal_len(quoted).ok_or(IdentityError::AltNameFormat)?;
                let (literal, _) = quoted.split_at(literal_len);
                current_token.push_str(&decode_json_string(literal)?);
                offset += quote + literal_len;
            }
            (_, Some(sep)) => {
                let (plain, _) = rest.split_at(sep);
                current_token.push_str(plain);
                result.push(std::mem::take(&mut current_token));
                offset += sep + SEPARATOR.len();
            }
            _ => {
                current_token.push_str(rest);
                offset = alt_names.len();
            }
        }
    }

    result.push(current_token);
    Ok(result)
}

/// Split `alt_names` and collect its `DNS:` and `IP Address:` entries.
///
/// Entries with any other type prefix (`email:`, `URI:`, ...) are ignored.
pub fn parse_alt_names<C>(alt_names: &str, ip: &C) -> Result<ParsedAltNames, IdentityError>
where
    C: IpCanonicalizer + ?Sized,
{
    let mut parsed = ParsedAltNames::default();
    for entry in split_alt_names(alt_names)? {
        if let Some(name) = entry.strip_prefix(DNS_PREFIX) {
            parsed.dns_names.push(name.to_owned());
        } else if let Some(addr) = entry.strip_prefix(IP_PREFIX) {
            let canonical = ip.canonicalize(addr).unwrap_or_else(|| addr.to_owned());
            parsed.ips.push(canonical);
        }
    }
    log::trace!(
        "subjectAltName: {} DNS name(s), {} IP address(es)",
        parsed.dns_names.len(),
        parsed.ips.len()
    );
    Ok(parsed)
}

/// Byte length of the longest prefix of `s` that is a complete JSON string
/// literal (RFC 8259 Section 7), quotes included. `s` must start with `"`.
fn json_string_literal_len(s: &str) -> Option<usize> {
    let mut chars = s.char_indices();
    if !matches!(chars.next(), Some((_, '"'))) {
        return None;
    }
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some(i + 1),
            '\\' => match chars.next()?.1 {
                '"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' => {}
                'u' => {
                    for _ in 0..4 {
                        if !chars.next()?.1.is_ascii_hexdigit() {
                            return None;
                        }
                    }
                }
                _ => return None,
            },
            '\u{0}'..='\u{1f}' => return None,
            _ => {}
        }
    }
    None
}

/// Decode a literal already validated by [`json_string_literal_len`].
///
/// Unpaired surrogate escapes have no `String` representation and are
/// reported as a format error.
fn decode_json_string(literal: &str) -> Result<String, IdentityError> {
    serde_json::from_str(literal).map_err(|_| IdentityError::AltNameFormat)
}
