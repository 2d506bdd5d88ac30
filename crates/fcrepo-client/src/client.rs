//! HTTP client for the Fedora REST API.
//!
//! One method per REST endpoint. Paths come from `fcrepo_core::paths`, so
//! identifiers are always encoded the same way.

use crate::config::RepositoryConfig;
use crate::request::{
    DatastreamRequest, DatastreamUpload, DisseminationRequest, FindObjectsRequest, IngestRequest,
    ObjectRequest, RelationshipRequest,
};
use fcrepo_core::paths::{
    CONTENT, DESCRIBE, NEW_RELATIONSHIP, NEXT_PID, OBJECTS, OBJECT_XML, RELATIONSHIPS, VERSIONS,
};
use fcrepo_core::{
    append_query, datastream_path, datastream_subresource_path, dissemination_path, object_path,
    object_subresource_path, strip_pid_prefix, PathError, ProfileError, QueryParams,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response, StatusCode};
use std::fs;
use url::Url;

/// Content type used when nothing better is known.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Pid the server replaces with a freshly minted one on ingest.
pub const NEW_PID: &str = "new";

/// HTTP client for Fedora REST API operations.
///
/// Built once from a [`RepositoryConfig`]; cheap to clone and safe to share
/// between tasks.
#[derive(Debug, Clone)]
pub struct RepositoryClient {
    client: Client,
    config: RepositoryConfig,
    base_url: String,
}

/// A single HTTP exchange.
struct Call {
    operation: String,
    method: Method,
    path: String,
    body: Option<(Vec<u8>, String)>,
    not_found: bool,
}

impl Call {
    fn new(method: Method, path: String, operation: String) -> Self {
        Self {
            operation,
            method,
            path,
            body: None,
            not_found: false,
        }
    }

    /// Report a 404 as [`ClientError::NotFound`].
    fn not_found(mut self) -> Self {
        self.not_found = true;
        self
    }

    fn body(mut self, body: Vec<u8>, content_type: String) -> Self {
        self.body = Some((body, content_type));
        self
    }
}

impl RepositoryClient {
    /// Create a new repository client.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid, the HTTP client cannot be
    /// created, or the mTLS certificate files cannot be read or parsed.
    pub fn new(config: RepositoryConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&config.url)
            .map_err(|e| ClientError::Init(format!("invalid repository URL {}: {e}", config.url)))?;

        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout());

        if base.scheme() == "https" {
            builder = builder.use_rustls_tls();

            if let (Some(cert_path), Some(key_path)) =
                (&config.ssl_client_cert, &config.ssl_client_key)
            {
                let cert_pem = fs::read(cert_path).map_err(|e| {
                    ClientError::Init(format!(
                        "failed to read client certificate {}: {e}",
                        cert_path.display()
                    ))
                })?;
                let key_pem = fs::read(key_path).map_err(|e| {
                    ClientError::Init(format!(
                        "failed to read client key {}: {e}",
                        key_path.display()
                    ))
                })?;

                let mut identity_pem = cert_pem;
                identity_pem.extend_from_slice(&key_pem);

                let identity = reqwest::Identity::from_pem(&identity_pem).map_err(|e| {
                    ClientError::Init(format!("failed to create client identity: {e}"))
                })?;
                builder = builder.identity(identity);
                tracing::debug!(
                    cert_path = %cert_path.display(),
                    key_path = %key_path.display(),
                    "Loaded client certificate for mTLS"
                );
            }
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            config,
        })
    }

    /// The configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Absolute URL of a repository-relative path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// `GET describe`: the repository description.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn describe(&self, params: &QueryParams) -> Result<String, ClientError> {
        let path = append_query(DESCRIBE, &with_default(params, "xml", "true"));
        let call = Call::new(Method::GET, path, "describing repository".to_string());
        text(self.send(call).await?).await
    }

    /// `POST objects/nextPID`: allocate new pids.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn next_pid(&self, params: &QueryParams) -> Result<String, ClientError> {
        let path = append_query(
            &format!("{OBJECTS}/{NEXT_PID}"),
            &with_default(params, "format", "xml"),
        );
        let call = Call::new(Method::POST, path, "getting nextPID".to_string());
        text(self.send(call).await?).await
    }

    /// `GET objects`: search by terms or by field query.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] if both terms and query are
    /// set, otherwise error on network or API errors.
    pub async fn find_objects(&self, request: &FindObjectsRequest) -> Result<String, ClientError> {
        let mut params = with_default(&request.params, "resultFormat", "xml");
        if let Some(terms) = &request.terms {
            params.insert("terms".to_string(), terms.clone());
        }
        if let Some(query) = &request.query {
            params.insert("query".to_string(), query.clone());
        }
        if params.contains_key("terms") && params.contains_key("query") {
            return Err(ClientError::InvalidArgument(
                "terms and query are mutually exclusive".to_string(),
            ));
        }

        let call = Call::new(
            Method::GET,
            object_path(None, &params),
            "finding objects".to_string(),
        );
        text(self.send(call).await?).await
    }

    /// `GET objects/{pid}`: the object profile.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if the object does not exist,
    /// otherwise error on network or API errors.
    pub async fn object(&self, request: &ObjectRequest) -> Result<String, ClientError> {
        let pid = required_pid(&request.pid)?;
        let path = object_path(Some(pid), &with_default(&request.params, "format", "xml"));
        let call = Call::new(Method::GET, path, format!("getting object {pid}")).not_found();
        text(self.send(call).await?).await
    }

    /// `POST objects/{pid}`: ingest FOXML, or create an empty object.
    ///
    /// Without a pid the object is ingested as `new` and the server mints one.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn ingest(&self, request: &IngestRequest) -> Result<String, ClientError> {
        let pid = request
            .pid
            .as_deref()
            .map(strip_pid_prefix)
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(NEW_PID);
        let call = Call::new(
            Method::POST,
            object_path(Some(pid), &request.params),
            format!("ingesting object {pid}"),
        )
        .body(
            request.content.clone().unwrap_or_default(),
            "text/xml".to_string(),
        );
        text(self.send(call).await?).await
    }

    /// `PUT objects/{pid}`: change object properties.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn modify_object(&self, request: &ObjectRequest) -> Result<String, ClientError> {
        let pid = required_pid(&request.pid)?;
        let call = Call::new(
            Method::PUT,
            object_path(Some(pid), &request.params),
            format!("modifying object {pid}"),
        );
        text(self.send(call).await?).await
    }

    /// `DELETE objects/{pid}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if the object does not exist,
    /// otherwise error on network or API errors.
    pub async fn purge_object(&self, request: &ObjectRequest) -> Result<String, ClientError> {
        let pid = required_pid(&request.pid)?;
        let call = Call::new(
            Method::DELETE,
            object_path(Some(pid), &request.params),
            format!("purging object {pid}"),
        )
        .not_found();
        text(self.send(call).await?).await
    }

    /// `GET objects/{pid}/versions`: the object history.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn object_versions(&self, request: &ObjectRequest) -> Result<String, ClientError> {
        let params = with_default(&request.params, "format", "xml");
        let path = object_subresource_path(Some(request.pid.as_str()), VERSIONS, &params)?;
        let call = Call::new(
            Method::GET,
            path,
            format!("getting versions for object {}", request.pid),
        );
        text(self.send(call).await?).await
    }

    /// `GET objects/{pid}/objectXML`: the FOXML serialization.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn object_xml(&self, request: &ObjectRequest) -> Result<String, ClientError> {
        let params = with_default(&request.params, "format", "xml");
        let path = object_subresource_path(Some(request.pid.as_str()), OBJECT_XML, &params)?;
        let call = Call::new(
            Method::GET,
            path,
            format!("getting objectXML for object {}", request.pid),
        );
        text(self.send(call).await?).await
    }

    /// `GET objects/{pid}/datastreams[/{dsid}]`: one datastream profile, or
    /// the datastream listing when `dsid` is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if the datastream does not exist,
    /// otherwise error on network or API errors.
    pub async fn datastream(&self, request: &DatastreamRequest) -> Result<String, ClientError> {
        let params = with_default(&request.params, "format", "xml");
        let path = datastream_path(Some(request.pid.as_str()), request.dsid.as_deref(), &params)?;
        let call = Call::new(
            Method::GET,
            path,
            format!(
                "getting datastream '{}' for object {}",
                request.dsid.as_deref().unwrap_or_default(),
                request.pid
            ),
        )
        .not_found();
        text(self.send(call).await?).await
    }

    /// `POST objects/{pid}/datastreams/{dsid}`: add a datastream.
    ///
    /// # Errors
    ///
    /// Returns error if a file payload cannot be read, or on network or API
    /// errors.
    pub async fn add_datastream(&self, request: &DatastreamUpload) -> Result<String, ClientError> {
        self.upload(Method::POST, request, "adding").await
    }

    /// `PUT objects/{pid}/datastreams/{dsid}`: replace content or properties.
    ///
    /// # Errors
    ///
    /// Returns error if a file payload cannot be read, or on network or API
    /// errors.
    pub async fn modify_datastream(
        &self,
        request: &DatastreamUpload,
    ) -> Result<String, ClientError> {
        self.upload(Method::PUT, request, "modifying").await
    }

    /// `PUT objects/{pid}/datastreams/{dsid}` without content: change
    /// datastream properties such as `dsState` or `versionable`.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn set_datastream_options(
        &self,
        request: &DatastreamRequest,
    ) -> Result<String, ClientError> {
        let dsid = required("dsid", request.dsid.as_deref().unwrap_or_default())?;
        let path = datastream_path(Some(request.pid.as_str()), Some(dsid), &request.params)?;
        let call = Call::new(
            Method::PUT,
            path,
            format!(
                "setting datastream options on {dsid} for object {}",
                request.pid
            ),
        );
        text(self.send(call).await?).await
    }

    /// `DELETE objects/{pid}/datastreams/{dsid}`.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn purge_datastream(
        &self,
        request: &DatastreamRequest,
    ) -> Result<String, ClientError> {
        let dsid = required("dsid", request.dsid.as_deref().unwrap_or_default())?;
        let path = datastream_path(Some(request.pid.as_str()), Some(dsid), &request.params)?;
        let call = Call::new(
            Method::DELETE,
            path,
            format!("purging datastream {dsid} for {}", request.pid),
        );
        text(self.send(call).await?).await
    }

    /// `GET objects/{pid}/datastreams/{dsid}/versions`: the datastream history.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] without a dsid, otherwise
    /// error on network or API errors.
    pub async fn datastream_versions(
        &self,
        request: &DatastreamRequest,
    ) -> Result<String, ClientError> {
        let params = with_default(&request.params, "format", "xml");
        let path = datastream_subresource_path(
            Some(request.pid.as_str()),
            request.dsid.as_deref(),
            VERSIONS,
            &params,
        )?;
        let call = Call::new(
            Method::GET,
            path,
            format!(
                "getting versions for datastream {} for object {}",
                request.dsid.as_deref().unwrap_or_default(),
                request.pid
            ),
        );
        text(self.send(call).await?).await
    }

    /// `GET objects/{pid}/datastreams/{dsid}/content`: the datastream bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if the datastream does not exist,
    /// otherwise error on network or API errors.
    pub async fn datastream_dissemination(
        &self,
        request: &DatastreamRequest,
    ) -> Result<Vec<u8>, ClientError> {
        let path = datastream_subresource_path(
            Some(request.pid.as_str()),
            request.dsid.as_deref(),
            CONTENT,
            &request.params,
        )?;
        let call = Call::new(
            Method::GET,
            path,
            format!(
                "getting dissemination for datastream {} for object {}",
                request.dsid.as_deref().unwrap_or_default(),
                request.pid
            ),
        )
        .not_found();
        bytes(self.send(call).await?).await
    }

    /// `GET objects/{pid}/relationships`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] without pid or subject,
    /// otherwise error on network or API errors.
    pub async fn relationships(
        &self,
        request: &RelationshipRequest,
    ) -> Result<String, ClientError> {
        let (pid, params) = relationship_target(request)?;
        let params = with_default(&params, "format", "xml");
        let path = object_subresource_path(Some(pid), RELATIONSHIPS, &params)?;
        let call = Call::new(
            Method::GET,
            path,
            format!("getting relationships for {pid}"),
        );
        text(self.send(call).await?).await
    }

    /// `POST objects/{pid}/relationships/new`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] without pid or subject,
    /// otherwise error on network or API errors.
    pub async fn add_relationship(
        &self,
        request: &RelationshipRequest,
    ) -> Result<String, ClientError> {
        let (pid, params) = relationship_target(request)?;
        let path = object_subresource_path(Some(pid), NEW_RELATIONSHIP, &params)?;
        let call = Call::new(
            Method::POST,
            path,
            format!("adding relationship for {pid}"),
        );
        text(self.send(call).await?).await
    }

    /// `DELETE objects/{pid}/relationships`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] without pid or subject,
    /// otherwise error on network or API errors.
    pub async fn purge_relationship(
        &self,
        request: &RelationshipRequest,
    ) -> Result<String, ClientError> {
        let (pid, params) = relationship_target(request)?;
        let path = object_subresource_path(Some(pid), RELATIONSHIPS, &params)?;
        let call = Call::new(
            Method::DELETE,
            path,
            format!("purging relationships for {pid}"),
        );
        text(self.send(call).await?).await
    }

    /// `GET objects/{pid}/methods[/{sdef}[/{method}]]`.
    ///
    /// With pid, sdef and method all given this runs the service method and
    /// returns its output as is; otherwise it lists the available methods as
    /// XML.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if the object or method does not
    /// exist, otherwise error on network or API errors.
    pub async fn dissemination(
        &self,
        request: &DisseminationRequest,
    ) -> Result<Vec<u8>, ClientError> {
        let complete = [
            Some(request.pid.as_str()),
            request.sdef.as_deref(),
            request.method.as_deref(),
        ]
        .iter()
        .all(|part| part.is_some_and(|p| !p.trim().is_empty()));

        let params = if complete {
            request.params.clone()
        } else {
            with_default(&request.params, "format", "xml")
        };
        let path = dissemination_path(
            Some(request.pid.as_str()),
            request.sdef.as_deref(),
            request.method.as_deref(),
            &params,
        )?;
        let call = Call::new(
            Method::GET,
            path,
            format!("getting dissemination for {}", request.pid),
        )
        .not_found();
        bytes(self.send(call).await?).await
    }

    async fn upload(
        &self,
        method: Method,
        request: &DatastreamUpload,
        verb: &str,
    ) -> Result<String, ClientError> {
        let dsid = required("dsid", &request.dsid)?;
        let path = datastream_path(Some(request.pid.as_str()), Some(dsid), &request.params)?;
        let mut call = Call::new(
            method,
            path,
            format!("{verb} datastream {dsid} for object {}", request.pid),
        );

        if let Some(content) = &request.content {
            let content_type = resolve_content_type(request);
            call = call.body(content.clone().into_bytes().await?, content_type);
        }

        text(self.send(call).await?).await
    }

    async fn send(&self, call: Call) -> Result<Response, ClientError> {
        let url = self.url_for(&call.path);

        tracing::debug!(operation = %call.operation, method = %call.method, url, "Fedora request");

        let mut request = self.client.request(call.method, &url);
        if let Some(user) = &self.config.user {
            request = request.basic_auth(user, self.config.password.as_ref());
        }
        if let Some((body, content_type)) = call.body {
            request = request.header(CONTENT_TYPE, content_type).body(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(operation = %call.operation, url, error = %e, "Fedora request failed");
                return Err(ClientError::RequestFailed {
                    operation: call.operation,
                    status: None,
                    response: e.to_string(),
                });
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND && call.not_found {
            return Err(ClientError::NotFound { url });
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => format!("failed to read response body: {e}"),
        };
        tracing::error!(
            operation = %call.operation,
            url,
            status = status.as_u16(),
            response = %body,
            "Fedora request failed"
        );
        Err(ClientError::RequestFailed {
            operation: call.operation,
            status: Some(status.as_u16()),
            response: body,
        })
    }
}

/// Explicit content type, then the `mimeType` parameter, then the file
/// extension, then [`DEFAULT_CONTENT_TYPE`].
#[must_use]
pub fn resolve_content_type(request: &DatastreamUpload) -> String {
    request
        .content_type
        .clone()
        .or_else(|| request.params.get("mimeType").cloned())
        .or_else(|| {
            request
                .content
                .as_ref()
                .and_then(crate::request::DatastreamContent::guess_content_type)
        })
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

fn with_default(params: &QueryParams, key: &str, value: &str) -> QueryParams {
    let mut params = params.clone();
    params
        .entry(key.to_string())
        .or_insert_with(|| value.to_string());
    params
}

fn required<'a>(name: &'static str, value: &'a str) -> Result<&'a str, ClientError> {
    if value.trim().is_empty() {
        return Err(PathError::MissingIdentifier(name).into());
    }
    Ok(value)
}

/// `value` without its `info:fedora/` prefix, which must leave a pid behind.
fn required_pid(value: &str) -> Result<&str, ClientError> {
    required("pid", strip_pid_prefix(value))
}

/// The object a relationship request addresses, and its query parameters.
fn relationship_target(
    request: &RelationshipRequest,
) -> Result<(&str, QueryParams), ClientError> {
    let pid = request
        .pid
        .as_deref()
        .or(request.subject.as_deref())
        .unwrap_or_default();
    let pid = required_pid(pid)?;

    let mut params = request.params.clone();
    if let Some(subject) = &request.subject {
        params.insert("subject".to_string(), subject.clone());
    }
    Ok((pid, params))
}

async fn text(response: Response) -> Result<String, ClientError> {
    let url = response.url().to_string();
    response
        .text()
        .await
        .map_err(|e| ClientError::RequestFailed {
            operation: format!("reading response from {url}"),
            status: None,
            response: e.to_string(),
        })
}

async fn bytes(response: Response) -> Result<Vec<u8>, ClientError> {
    let url = response.url().to_string();
    response
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| ClientError::RequestFailed {
            operation: format!("reading response from {url}"),
            status: None,
            response: e.to_string(),
        })
}

/// Errors that can occur with the repository client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// Client initialization failed
    #[error("client init error: {0}")]
    Init(String),
    /// A required identifier is missing or options conflict
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The server reports that the resource does not exist
    #[error("resource not found: {url}")]
    NotFound {
        /// Requested URL
        url: String,
    },
    /// The request failed for any other reason
    #[error("error {operation}; see log for the server response")]
    RequestFailed {
        /// What was being attempted, e.g. `getting object demo:1`
        operation: String,
        /// HTTP status, absent for transport errors
        status: Option<u16>,
        /// Raw response body or transport error message
        response: String,
    },
    /// Profile XML could not be parsed
    #[error("profile parse error: {0}")]
    Parse(#[from] ProfileError),
    /// Upload content could not be read
    #[error("content error: {0}")]
    Content(String),
}

impl ClientError {
    /// Whether this is [`ClientError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<PathError> for ClientError {
    fn from(e: PathError) -> Self {
        Self::InvalidArgument(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{DatastreamContent, WithParams};
    use std::path::PathBuf;

    #[test]
    fn client_creation() {
        let client = RepositoryClient::new(RepositoryConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn invalid_url_fails() {
        let config = RepositoryConfig {
            url: "not a url".to_string(),
            ..Default::default()
        };
        let err = RepositoryClient::new(config).unwrap_err();
        assert!(matches!(err, ClientError::Init(_)));
    }

    #[test]
    fn client_creation_with_missing_cert_fails() {
        let config = RepositoryConfig {
            url: "https://localhost:8443/fedora".to_string(),
            ssl_client_cert: Some(PathBuf::from("/nonexistent/client.pem")),
            ssl_client_key: Some(PathBuf::from("/nonexistent/client.key")),
            ..Default::default()
        };

        let err_msg = RepositoryClient::new(config).unwrap_err().to_string();
        assert!(err_msg.contains("client init error"));
    }

    #[test]
    fn url_for_trims_trailing_slash() {
        let config = RepositoryConfig {
            url: "http://localhost:8080/fedora/".to_string(),
            ..Default::default()
        };
        let client = RepositoryClient::new(config).unwrap();
        assert_eq!(
            client.url_for("objects/demo:1"),
            "http://localhost:8080/fedora/objects/demo:1"
        );
    }

    #[test]
    fn content_type_resolution_order() {
        let file = Some(DatastreamContent::File(PathBuf::from("/tmp/image.png")));

        let explicit = DatastreamUpload {
            content_type: Some("application/xml".to_string()),
            ..DatastreamUpload::new("demo:1", "DS1", file.clone())
        }
        .param("mimeType", "image/jpeg");
        assert_eq!(resolve_content_type(&explicit), "application/xml");

        let declared = DatastreamUpload::new("demo:1", "DS1", file.clone()).param("mimeType", "image/jpeg");
        assert_eq!(resolve_content_type(&declared), "image/jpeg");

        let inferred = DatastreamUpload::new("demo:1", "DS1", file);
        assert_eq!(resolve_content_type(&inferred), "image/png");

        let fallback = DatastreamUpload::new(
            "demo:1",
            "DS1",
            Some(DatastreamContent::Bytes(b"hello".to_vec())),
        );
        assert_eq!(resolve_content_type(&fallback), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn bare_pid_prefix_is_rejected() {
        assert!(matches!(
            required_pid("info:fedora/"),
            Err(ClientError::InvalidArgument(_))
        ));
        assert_eq!(required_pid("info:fedora/demo:1").unwrap(), "demo:1");

        let request = RelationshipRequest {
            pid: None,
            subject: Some("info:fedora/".to_string()),
            params: QueryParams::new(),
        };
        assert!(matches!(
            relationship_target(&request),
            Err(ClientError::InvalidArgument(_))
        ));
    }

    #[test]
    fn with_default_keeps_caller_value() {
        let mut params = QueryParams::new();
        params.insert("format".to_string(), "html".to_string());
        assert_eq!(with_default(&params, "format", "xml")["format"], "html");
        assert_eq!(with_default(&QueryParams::new(), "format", "xml")["format"], "xml");
    }

    #[test]
    fn relationship_target_prefers_pid_and_forwards_subject() {
        let request = RelationshipRequest {
            pid: None,
            subject: Some("info:fedora/demo:1".to_string()),
            params: QueryParams::new(),
        };
        let (pid, params) = relationship_target(&request).unwrap();
        assert_eq!(pid, "demo:1");
        assert_eq!(params["subject"], "info:fedora/demo:1");

        let missing = RelationshipRequest::default();
        assert!(matches!(
            relationship_target(&missing),
            Err(ClientError::InvalidArgument(_))
        ));
    }
}
