//! Canonical request construction for SAuthc1.
//!
//! SAuthc1 signs a deterministic string representation of the request:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalResourcePath\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! `CanonicalHeaders` carries its own trailing newline, so a blank line
//! separates the header block from the signed-headers list. Each component
//! is normalized so that sign and verify paths always produce identical
//! bytes; any divergence in encoding or ordering diverges the signature.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// The set of characters percent-encoded in canonical query keys and values.
///
/// Everything except RFC 3986 unreserved characters
/// (A-Z, a-z, 0-9, `-`, `_`, `.`, `~`) is encoded, including `/`.
const CANONICAL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Build the full canonical request string from its components.
///
/// # Examples
///
/// ```
/// use stormpath_auth::canonical::canonical_request;
///
/// let canonical = canonical_request(
///     "GET",
///     "/v1/",
///     "",
///     &[("Host", "api.stormpath.com")],
///     &["host"],
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// );
/// assert!(canonical.starts_with("GET\n/v1/\n"));
/// ```
#[must_use]
pub fn canonical_request(
    method: &str,
    path: &str,
    query: &str,
    headers: &[(&str, &str)],
    signed_headers: &[&str],
    payload_hash: &str,
) -> String {
    let canonical_path = canonicalize_resource_path(path);
    let canonical_query = canonicalize_query_string(query);
    let canonical_headers = canonicalize_headers(headers, signed_headers);
    let signed_headers_str = signed_headers_string(signed_headers);

    format!(
        "{method}\n{canonical_path}\n{canonical_query}\n{canonical_headers}\n{signed_headers_str}\n{payload_hash}"
    )
}

/// Build the canonical resource path by encoding each path segment.
///
/// Forward slashes (`/`) are preserved. Empty paths are normalized to `/`.
/// Segments are percent-decoded first so that an already-encoded path is not
/// double-encoded, then re-encoded with the unreserved character set.
///
/// # Examples
///
/// ```
/// use stormpath_auth::canonical::canonicalize_resource_path;
///
/// assert_eq!(canonicalize_resource_path("/v1/directories"), "/v1/directories");
/// assert_eq!(canonicalize_resource_path(""), "/");
/// assert_eq!(canonicalize_resource_path("/a b"), "/a%20b");
/// ```
#[must_use]
pub fn canonicalize_resource_path(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    path.split('/')
        .map(|segment| {
            let decoded = percent_decode_str(segment).decode_utf8_lossy();
            utf8_percent_encode(&decoded, CANONICAL_ENCODE_SET).to_string()
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Build the canonical query string.
///
/// The raw query is split on `&`/`=`, each key and value is form-decoded
/// (`+` means space, `%XX` sequences are resolved) and then re-encoded with
/// the unreserved character set, so the canonical form is independent of the
/// encoding the caller happened to use in the URI. Pairs are sorted by
/// encoded key, then by encoded value for duplicate keys.
///
/// # Examples
///
/// ```
/// use stormpath_auth::canonical::canonicalize_query_string;
///
/// assert_eq!(canonicalize_query_string(""), "");
/// assert_eq!(canonicalize_query_string("b=2&a=1"), "a=1&b=2");
/// assert_eq!(
///     canonicalize_query_string("orderBy=name+asc"),
///     "orderBy=name%20asc"
/// );
/// ```
#[must_use]
pub fn canonicalize_query_string(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }

    let mut params: Vec<(String, String)> = query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|param| {
            let (key, value) = param.split_once('=').unwrap_or((param, ""));
            (canonical_encode(key), canonical_encode(value))
        })
        .collect();

    params.sort_unstable();

    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical headers block from the request headers.
///
/// Only headers listed in `signed_headers` are included. Header names are
/// lowercased, values are trimmed, duplicate names are joined with commas,
/// and lines are sorted by name. Every line is terminated by a newline,
/// including the last one; the canonical request format depends on that
/// trailing newline.
#[must_use]
pub fn canonicalize_headers(headers: &[(&str, &str)], signed_headers: &[&str]) -> String {
    let mut header_map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let lower_name = name.to_lowercase();
        let trimmed_value = value.trim().to_owned();
        header_map
            .entry(lower_name)
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&trimmed_value);
            })
            .or_insert(trimmed_value);
    }

    let mut sorted_signed: Vec<&str> = signed_headers.to_vec();
    sorted_signed.sort_unstable();

    sorted_signed
        .iter()
        .filter_map(|name| header_map.get(*name).map(|value| format!("{name}:{value}\n")))
        .collect()
}

/// Build the signed headers string as a semicolon-separated sorted list of
/// lowercase header names.
///
/// # Examples
///
/// ```
/// use stormpath_auth::canonical::signed_headers_string;
///
/// assert_eq!(
///     signed_headers_string(&["x-stormpath-date", "host"]),
///     "host;x-stormpath-date"
/// );
/// ```
#[must_use]
pub fn signed_headers_string(signed_headers: &[&str]) -> String {
    let mut sorted: Vec<&str> = signed_headers.to_vec();
    sorted.sort_unstable();
    sorted.join(";")
}

/// Form-decode `input` and re-encode it with the unreserved character set.
fn canonical_encode(input: &str) -> String {
    let spaced = input.replace('+', " ");
    let decoded = percent_decode_str(&spaced).decode_utf8_lossy().into_owned();
    utf8_percent_encode(&decoded, CANONICAL_ENCODE_SET).to_string()
}
