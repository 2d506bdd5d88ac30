//! # fcrepo core
//!
//! I/O-free building blocks for talking to a Fedora Commons 3.x repository
//! over its REST API.
//!
//! - [`paths`]: endpoint paths and query strings, with every identifier
//!   percent-encoded as a single path segment
//! - [`profile`]: access/management profile XML turned into [`ProfileRecord`]s
//!
//! Nothing here touches the network; `fcrepo-client` executes the requests.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod paths;
pub mod profile;

pub use paths::{
    append_query, datastream_path, datastream_subresource_path, decode_segment,
    dissemination_path, encode_segment, object_path, object_subresource_path, parse_query,
    strip_pid_prefix, PathError, QueryParams,
};
pub use profile::{
    parse_datastream_history, parse_datastream_profile, parse_object_history,
    parse_object_profile, parse_repository_profile, parse_version_history, HistoryKind,
    ProfileError, ProfileRecord, ProfileValue, VersionHistory,
};
