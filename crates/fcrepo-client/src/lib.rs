//! # Fedora REST client
//!
//! Async client for the Fedora Commons 3.x REST API.
//!
//! [`RepositoryClient`] exposes one method per REST endpoint. Each method takes
//! an explicit request struct (identifiers plus pass-through query
//! parameters), issues exactly one HTTP request and returns the raw response.
//! The profile methods in [`service`] combine a request with the
//! `fcrepo-core` profile parser.
//!
//! ## Errors
//!
//! A missing resource is reported as [`ClientError::NotFound`] by the fetch
//! operations, so callers can treat it as an expected outcome. Every other
//! failure is a [`ClientError::RequestFailed`] carrying the raw server response.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod request;
pub mod service;

pub use client::{ClientError, RepositoryClient};
pub use config::RepositoryConfig;
pub use fcrepo_core::{ProfileRecord, ProfileValue, QueryParams};
pub use request::{
    DatastreamContent, DatastreamRequest, DatastreamUpload, DisseminationRequest,
    FindObjectsRequest, IngestRequest, ObjectRequest, RelationshipRequest, WithParams,
};
