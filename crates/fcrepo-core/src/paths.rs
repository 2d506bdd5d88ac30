//! Fedora REST API endpoint paths.
//!
//! Implements the addressing rules of the Fedora 3.x REST API:
//!
//! - Every identifier (pid, dsid, sdef, method) is percent-encoded on its own
//!   and becomes exactly one path segment
//! - A leading `info:fedora/` URI prefix is dropped from pids
//! - Query keys and values are percent-encoded independently
//!
//! Paths are relative to the repository base URL, e.g.
//! `objects/demo:1/datastreams/DC?format=xml`.
//!
//! # References
//!
//! - <https://wiki.duraspace.org/display/FCR30/REST+API>

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;

/// Pass-through query parameters, serialized verbatim into the query string.
pub type QueryParams = BTreeMap<String, String>;

/// URI prefix under which the repository publishes object pids.
pub const PID_URI_PREFIX: &str = "info:fedora/";

/// Root collection of all object endpoints.
pub const OBJECTS: &str = "objects";
/// Repository description endpoint.
pub const DESCRIBE: &str = "describe";
/// Identifier allocation, below [`OBJECTS`].
pub const NEXT_PID: &str = "nextPID";
/// Version listing, below an object or a datastream.
pub const VERSIONS: &str = "versions";
/// FOXML export, below an object.
pub const OBJECT_XML: &str = "objectXML";
/// Datastream content, below a datastream.
pub const CONTENT: &str = "content";
/// Relationship listing and removal, below an object.
pub const RELATIONSHIPS: &str = "relationships";
/// Relationship creation, below an object.
pub const NEW_RELATIONSHIP: &str = "relationships/new";

/// Characters that must be percent-encoded in a path segment.
/// `:` is kept so namespaced pids read naturally (`demo:1`).
const SEGMENT_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b':');

/// Characters that must be percent-encoded in a query key or value.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Remove any leading `info:fedora/` prefix from a pid.
///
/// Repeated prefixes are removed as well, so the function is idempotent.
///
/// # Examples
///
/// ```
/// use fcrepo_core::strip_pid_prefix;
///
/// assert_eq!(strip_pid_prefix("info:fedora/demo:1"), "demo:1");
/// assert_eq!(strip_pid_prefix("demo:1"), "demo:1");
/// ```
#[must_use]
pub fn strip_pid_prefix(pid: &str) -> &str {
    pid.trim_start_matches(PID_URI_PREFIX)
}

/// Percent-encode a single path segment.
///
/// # Examples
///
/// ```
/// use fcrepo_core::encode_segment;
///
/// assert_eq!(encode_segment("demo:1"), "demo:1");
/// assert_eq!(encode_segment("a/b c"), "a%2Fb%20c");
/// ```
#[must_use]
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT_ESCAPE).to_string()
}

/// Decode a percent-encoded path segment.
///
/// # Errors
///
/// Returns error if the decoded bytes are not valid UTF-8.
pub fn decode_segment(encoded: &str) -> Result<String, PathError> {
    decode_component(encoded)
}

/// Append `?key=value&...` to `path`.
///
/// An empty map leaves the path unchanged.
///
/// # Examples
///
/// ```
/// use fcrepo_core::{append_query, QueryParams};
///
/// assert_eq!(append_query("objects", &QueryParams::new()), "objects");
///
/// let mut query = QueryParams::new();
/// query.insert("terms".to_string(), "a b".to_string());
/// assert_eq!(append_query("objects", &query), "objects?terms=a%20b");
/// ```
#[must_use]
pub fn append_query(path: &str, query: &QueryParams) -> String {
    if query.is_empty() {
        return path.to_string();
    }

    let pairs: Vec<String> = query
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_ESCAPE),
                utf8_percent_encode(value, QUERY_ESCAPE)
            )
        })
        .collect();

    format!("{path}?{}", pairs.join("&"))
}

/// Parse a query string produced by [`append_query`] back into its pairs.
///
/// A leading `?` is accepted. Pairs without `=` map to an empty value.
///
/// # Errors
///
/// Returns error if a key or value does not decode to UTF-8.
pub fn parse_query(query: &str) -> Result<QueryParams, PathError> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut params = QueryParams::new();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(decode_component(key)?, decode_component(value)?);
    }

    Ok(params)
}

/// Path of the object collection, or of a single object when `pid` is given.
///
/// A blank `pid`, or one that is only the `info:fedora/` prefix, addresses the
/// collection.
///
/// # Examples
///
/// ```
/// use fcrepo_core::{object_path, QueryParams};
///
/// let none = QueryParams::new();
/// assert_eq!(object_path(None, &none), "objects");
/// assert_eq!(object_path(Some("info:fedora/demo:1"), &none), "objects/demo:1");
/// ```
#[must_use]
pub fn object_path(pid: Option<&str>, query: &QueryParams) -> String {
    append_query(&object_base(pid), query)
}

/// Path of a resource below an object, e.g. `objects/{pid}/versions`.
///
/// `suffix` is one of the endpoint constants of this module and is not
/// encoded.
///
/// # Errors
///
/// Returns [`PathError::MissingIdentifier`] if `pid` is absent or blank.
pub fn object_subresource_path(
    pid: Option<&str>,
    suffix: &str,
    query: &QueryParams,
) -> Result<String, PathError> {
    let pid = require_pid(pid)?;
    let base = format!("{}/{suffix}", object_base(Some(pid)));
    Ok(append_query(&base, query))
}

/// Path of an object's datastream collection, or of one datastream. A blank
/// `dsid` addresses the collection.
///
/// # Examples
///
/// ```
/// use fcrepo_core::{datastream_path, QueryParams};
///
/// let path = datastream_path(Some("test:1"), Some("content"), &QueryParams::new()).unwrap();
/// assert_eq!(path, "objects/test:1/datastreams/content");
/// ```
///
/// # Errors
///
/// Returns [`PathError::MissingIdentifier`] if `pid` is absent or blank.
pub fn datastream_path(
    pid: Option<&str>,
    dsid: Option<&str>,
    query: &QueryParams,
) -> Result<String, PathError> {
    let base = datastream_base(pid, dsid)?;
    Ok(append_query(&base, query))
}

/// Path of a resource below a datastream, e.g. `.../datastreams/{dsid}/content`.
///
/// # Errors
///
/// Returns [`PathError::MissingIdentifier`] if `pid` or `dsid` is absent.
pub fn datastream_subresource_path(
    pid: Option<&str>,
    dsid: Option<&str>,
    suffix: &str,
    query: &QueryParams,
) -> Result<String, PathError> {
    let dsid = require("dsid", dsid)?;
    let base = format!("{}/{suffix}", datastream_base(pid, Some(dsid))?);
    Ok(append_query(&base, query))
}

/// Path of an object's disseminations: `objects/{pid}/methods[/{sdef}[/{method}]]`.
///
/// `sdef` and `method` segments are appended only when supplied.
///
/// # Errors
///
/// Returns [`PathError::MissingIdentifier`] if `pid` is absent or blank.
pub fn dissemination_path(
    pid: Option<&str>,
    sdef: Option<&str>,
    method: Option<&str>,
    query: &QueryParams,
) -> Result<String, PathError> {
    let pid = require_pid(pid)?;
    let mut path = format!("{}/methods", object_base(Some(pid)));
    for segment in [sdef, method].into_iter().flatten().filter_map(present) {
        path.push('/');
        path.push_str(&encode_segment(segment));
    }
    Ok(append_query(&path, query))
}

fn object_base(pid: Option<&str>) -> String {
    match pid.map(strip_pid_prefix).and_then(present) {
        Some(pid) => format!("{OBJECTS}/{}", encode_segment(pid)),
        None => OBJECTS.to_string(),
    }
}

fn datastream_base(pid: Option<&str>, dsid: Option<&str>) -> Result<String, PathError> {
    let pid = require_pid(pid)?;
    let mut path = format!("{}/datastreams", object_base(Some(pid)));
    if let Some(dsid) = dsid.and_then(present) {
        path.push('/');
        path.push_str(&encode_segment(dsid));
    }
    Ok(path)
}

fn present(value: &str) -> Option<&str> {
    (!value.trim().is_empty()).then_some(value)
}

fn require<'a>(name: &'static str, value: Option<&'a str>) -> Result<&'a str, PathError> {
    value.and_then(present).ok_or(PathError::MissingIdentifier(name))
}

/// A pid with its `info:fedora/` prefix removed; a bare prefix counts as missing.
fn require_pid(pid: Option<&str>) -> Result<&str, PathError> {
    require("pid", pid.map(strip_pid_prefix))
}

fn decode_component(encoded: &str) -> Result<String, PathError> {
    percent_decode_str(encoded)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| PathError::Utf8Decode(e.to_string()))
}

/// Errors that can occur while building or decoding paths.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A required identifier was absent or blank
    #[error("missing required identifier: {0}")]
    MissingIdentifier(&'static str),
    /// UTF-8 decoding failed
    #[error("UTF-8 decode error: {0}")]
    Utf8Decode(String),
}
