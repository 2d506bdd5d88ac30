//! Repository connection configuration.

use crate::client::ClientError;
use std::path::PathBuf;
use std::time::Duration;

/// Connection settings for a Fedora repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Base URL of the repository (e.g., <http://localhost:8080/fedora>)
    pub url: String,

    /// User for HTTP basic authentication
    pub user: Option<String>,

    /// Password for HTTP basic authentication
    pub password: Option<String>,

    /// Overall request timeout
    pub timeout: Duration,

    /// Connect timeout, defaults to `timeout`
    pub open_timeout: Option<Duration>,

    /// Client certificate path for mTLS authentication (PEM format)
    pub ssl_client_cert: Option<PathBuf>,

    /// Client private key path for mTLS authentication (PEM format)
    pub ssl_client_key: Option<PathBuf>,

    /// Ask the server to validate checksums on every datastream profile
    pub validate_checksum: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/fedora".to_string(),
            user: Some("fedoraAdmin".to_string()),
            password: Some("fedoraAdmin".to_string()),
            timeout: Duration::from_secs(60),
            open_timeout: None,
            ssl_client_cert: None,
            ssl_client_key: None,
            validate_checksum: false,
        }
    }
}

impl RepositoryConfig {
    /// Effective connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.open_timeout.unwrap_or(self.timeout)
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `FEDORA_URL`: Repository base URL
    /// - `FEDORA_USER` / `FEDORA_PASSWORD`: Basic auth credentials
    /// - `FEDORA_TIMEOUT_SECS`: Request timeout in seconds
    /// - `FEDORA_OPEN_TIMEOUT_SECS`: Connect timeout in seconds
    /// - `FEDORA_SSL_CLIENT_CERT` / `FEDORA_SSL_CLIENT_KEY`: mTLS PEM files
    /// - `FEDORA_VALIDATE_CHECKSUM`: `true` to validate datastream checksums
    ///
    /// Unset variables keep their default.
    ///
    /// # Errors
    ///
    /// Returns error if a numeric or boolean variable cannot be parsed.
    pub fn from_env() -> Result<Self, ClientError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("FEDORA_URL") {
            config.url = url;
        }

        if let Ok(user) = std::env::var("FEDORA_USER") {
            config.user = Some(user);
        }

        if let Ok(password) = std::env::var("FEDORA_PASSWORD") {
            config.password = Some(password);
        }

        if let Some(timeout) = env_secs("FEDORA_TIMEOUT_SECS")? {
            config.timeout = timeout;
        }

        config.open_timeout = env_secs("FEDORA_OPEN_TIMEOUT_SECS")?;

        if let Ok(cert) = std::env::var("FEDORA_SSL_CLIENT_CERT") {
            config.ssl_client_cert = Some(PathBuf::from(cert));
        }

        if let Ok(key) = std::env::var("FEDORA_SSL_CLIENT_KEY") {
            config.ssl_client_key = Some(PathBuf::from(key));
        }

        if let Ok(flag) = std::env::var("FEDORA_VALIDATE_CHECKSUM") {
            config.validate_checksum = flag.trim().parse().map_err(|_| {
                ClientError::Init(format!("invalid FEDORA_VALIDATE_CHECKSUM: {flag}"))
            })?;
        }

        Ok(config)
    }
}

fn env_secs(name: &str) -> Result<Option<Duration>, ClientError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ClientError::Init(format!("invalid {name}: {value}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default() {
        let config = RepositoryConfig::default();
        assert_eq!(config.url, "http://localhost:8080/fedora");
        assert_eq!(config.user.as_deref(), Some("fedoraAdmin"));
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.open_timeout.is_none());
        assert!(config.ssl_client_cert.is_none());
        assert!(config.ssl_client_key.is_none());
        assert!(!config.validate_checksum);
    }

    #[test]
    fn open_timeout_falls_back_to_timeout() {
        let mut config = RepositoryConfig {
            timeout: Duration::from_secs(5),
            ..Default::default()
        };
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));

        config.open_timeout = Some(Duration::from_secs(2));
        assert_eq!(config.connect_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn env_secs_rejects_garbage() {
        std::env::set_var("FCREPO_TEST_TIMEOUT_GARBAGE", "soon");
        let err = env_secs("FCREPO_TEST_TIMEOUT_GARBAGE").unwrap_err();
        assert!(err.to_string().contains("FCREPO_TEST_TIMEOUT_GARBAGE"));

        std::env::set_var("FCREPO_TEST_TIMEOUT_OK", "12");
        assert_eq!(
            env_secs("FCREPO_TEST_TIMEOUT_OK").unwrap(),
            Some(Duration::from_secs(12))
        );
        assert_eq!(env_secs("FCREPO_TEST_TIMEOUT_UNSET").unwrap(), None);
    }
}
