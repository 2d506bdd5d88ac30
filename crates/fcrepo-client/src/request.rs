//! Request parameters for the REST operations.
//!
//! Identifiers are explicit fields; everything else the server understands
//! (`asOfDateTime`, `dsLabel`, `logMessage`, ...) goes into `params` and is
//! forwarded verbatim as query parameters.

use crate::client::ClientError;
use fcrepo_core::QueryParams;
use std::path::PathBuf;

/// Access to a request's pass-through query parameters.
pub trait WithParams: Sized {
    /// Mutable access to the query parameters.
    fn params_mut(&mut self) -> &mut QueryParams;

    /// Add a query parameter, replacing any previous value for `key`.
    #[must_use]
    fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params_mut().insert(key.into(), value.into());
        self
    }
}

/// `GET objects` search. `terms` and `query` are mutually exclusive.
#[derive(Debug, Clone, Default)]
pub struct FindObjectsRequest {
    /// Simple search terms
    pub terms: Option<String>,
    /// Field query expression
    pub query: Option<String>,
    /// Other query parameters (`pid`, `label`, `maxResults`, ...)
    pub params: QueryParams,
}

impl FindObjectsRequest {
    /// Search by terms.
    pub fn terms(terms: impl Into<String>) -> Self {
        Self {
            terms: Some(terms.into()),
            ..Self::default()
        }
    }

    /// Search by field query.
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }
}

/// Request addressing one object.
#[derive(Debug, Clone, Default)]
pub struct ObjectRequest {
    /// Object pid, with or without the `info:fedora/` prefix
    pub pid: String,
    /// Query parameters
    pub params: QueryParams,
}

impl ObjectRequest {
    /// Address the object `pid`.
    pub fn new(pid: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            params: QueryParams::new(),
        }
    }
}

/// `POST objects/{pid}` ingest of a FOXML document.
#[derive(Debug, Clone, Default)]
pub struct IngestRequest {
    /// Requested pid; the server allocates one when absent
    pub pid: Option<String>,
    /// Raw FOXML
    pub content: Option<Vec<u8>>,
    /// Query parameters (`label`, `format`, `logMessage`, ...)
    pub params: QueryParams,
}

/// Request addressing an object's datastreams, or one of them.
#[derive(Debug, Clone, Default)]
pub struct DatastreamRequest {
    /// Object pid
    pub pid: String,
    /// Datastream id; required by every operation except listing
    pub dsid: Option<String>,
    /// Query parameters
    pub params: QueryParams,
}

impl DatastreamRequest {
    /// Address datastream `dsid` of object `pid`.
    pub fn new(pid: impl Into<String>, dsid: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            dsid: Some(dsid.into()),
            params: QueryParams::new(),
        }
    }

    /// Address all datastreams of object `pid`.
    pub fn list(pid: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            dsid: None,
            params: QueryParams::new(),
        }
    }
}

/// Payload of a datastream add or modify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatastreamContent {
    /// In-memory content
    Bytes(Vec<u8>),
    /// Content read from a file; the extension informs the content type
    File(PathBuf),
}

impl DatastreamContent {
    /// Content type inferred from the file extension, if any.
    #[must_use]
    pub fn guess_content_type(&self) -> Option<String> {
        match self {
            Self::File(path) => mime_guess::from_path(path).first().map(|m| m.to_string()),
            Self::Bytes(_) => None,
        }
    }

    /// Load the payload.
    ///
    /// # Errors
    ///
    /// Returns error if a file-backed payload cannot be read.
    pub async fn into_bytes(self) -> Result<Vec<u8>, ClientError> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::File(path) => tokio::fs::read(&path).await.map_err(|e| {
                ClientError::Content(format!("failed to read {}: {e}", path.display()))
            }),
        }
    }
}

/// `POST`/`PUT objects/{pid}/datastreams/{dsid}` with optional content.
#[derive(Debug, Clone, Default)]
pub struct DatastreamUpload {
    /// Object pid
    pub pid: String,
    /// Datastream id
    pub dsid: String,
    /// Content; omitted for metadata-only changes or `dsLocation` references
    pub content: Option<DatastreamContent>,
    /// Explicit content type, overriding `mimeType` and inference
    pub content_type: Option<String>,
    /// Query parameters (`controlGroup`, `dsLabel`, `mimeType`, ...)
    pub params: QueryParams,
}

impl DatastreamUpload {
    /// Upload `content` as datastream `dsid` of object `pid`.
    pub fn new(
        pid: impl Into<String>,
        dsid: impl Into<String>,
        content: Option<DatastreamContent>,
    ) -> Self {
        Self {
            pid: pid.into(),
            dsid: dsid.into(),
            content,
            content_type: None,
            params: QueryParams::new(),
        }
    }
}

/// Relationship operations. The object may be given as `pid` or `subject`.
#[derive(Debug, Clone, Default)]
pub struct RelationshipRequest {
    /// Object pid
    pub pid: Option<String>,
    /// Relationship subject; used as pid when `pid` is absent
    pub subject: Option<String>,
    /// Query parameters (`predicate`, `object`, `isLiteral`, `datatype`)
    pub params: QueryParams,
}

impl RelationshipRequest {
    /// Relationships of object `pid`.
    pub fn new(pid: impl Into<String>) -> Self {
        Self {
            pid: Some(pid.into()),
            ..Self::default()
        }
    }
}

/// `GET objects/{pid}/methods[/{sdef}[/{method}]]`.
#[derive(Debug, Clone, Default)]
pub struct DisseminationRequest {
    /// Object pid
    pub pid: String,
    /// Service definition pid
    pub sdef: Option<String>,
    /// Method name
    pub method: Option<String>,
    /// Method parameters
    pub params: QueryParams,
}

impl DisseminationRequest {
    /// Disseminations of object `pid`.
    pub fn new(pid: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            ..Self::default()
        }
    }
}

impl WithParams for FindObjectsRequest {
    fn params_mut(&mut self) -> &mut QueryParams {
        &mut self.params
    }
}

impl WithParams for ObjectRequest {
    fn params_mut(&mut self) -> &mut QueryParams {
        &mut self.params
    }
}

impl WithParams for IngestRequest {
    fn params_mut(&mut self) -> &mut QueryParams {
        &mut self.params
    }
}

impl WithParams for DatastreamRequest {
    fn params_mut(&mut self) -> &mut QueryParams {
        &mut self.params
    }
}

impl WithParams for DatastreamUpload {
    fn params_mut(&mut self) -> &mut QueryParams {
        &mut self.params
    }
}

impl WithParams for RelationshipRequest {
    fn params_mut(&mut self) -> &mut QueryParams {
        &mut self.params
    }
}

impl WithParams for DisseminationRequest {
    fn params_mut(&mut self) -> &mut QueryParams {
        &mut self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn param_replaces_previous_value() {
        let request = ObjectRequest::new("demo:1")
            .param("asOfDateTime", "2020-01-01")
            .param("asOfDateTime", "2021-01-01");
        assert_eq!(request.params.len(), 1);
        assert_eq!(request.params["asOfDateTime"], "2021-01-01");
    }

    #[test]
    fn guess_content_type_from_extension() {
        let pdf = DatastreamContent::File(PathBuf::from("/tmp/report.pdf"));
        assert_eq!(pdf.guess_content_type().as_deref(), Some("application/pdf"));

        let unknown = DatastreamContent::File(PathBuf::from("/tmp/blob.zzzunknown"));
        assert!(unknown.guess_content_type().is_none());

        let bytes = DatastreamContent::Bytes(b"abc".to_vec());
        assert!(bytes.guess_content_type().is_none());
    }

    #[test]
    fn file_content_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<dc/>").unwrap();

        let content = DatastreamContent::File(file.path().to_path_buf());
        let bytes = tokio_test::block_on(content.into_bytes()).unwrap();
        assert_eq!(bytes, b"<dc/>");
    }

    #[test]
    fn missing_file_is_content_error() {
        let content = DatastreamContent::File(PathBuf::from("/nonexistent/fcrepo/content.xml"));
        let err = tokio_test::block_on(content.into_bytes()).unwrap_err();
        assert!(matches!(err, ClientError::Content(_)));
    }
}
