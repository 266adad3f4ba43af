use url::Url;

use crate::services::webdav::WebDAVError;

/// Run configuration, built once from the command line and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    /// Target directory URL, normalized to end with a slash.
    pub url: String,
    pub username: String,
    pub token: String,
    pub timeout_seconds: u64,
}

impl Config {
    pub fn new(
        url: &str,
        username: &str,
        token: &str,
        timeout_seconds: u64,
    ) -> Result<Self, WebDAVError> {
        let url = if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{}/", url)
        };

        let config = Self {
            url,
            username: username.to_string(),
            token: token.to_string(),
            timeout_seconds,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration before any network call is made.
    pub fn validate(&self) -> Result<(), WebDAVError> {
        let parsed = Url::parse(&self.url).map_err(|e| {
            WebDAVError::InvalidConfig(format!("invalid URL '{}': {}", self.url, e))
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(WebDAVError::InvalidConfig(format!(
                    "unsupported URL scheme '{}' (expected http or https)",
                    other
                )));
            }
        }

        if self.username.is_empty() {
            return Err(WebDAVError::InvalidConfig("username is empty".to_string()));
        }
        if self.token.is_empty() {
            return Err(WebDAVError::InvalidConfig("token is empty".to_string()));
        }
        if self.timeout_seconds == 0 {
            return Err(WebDAVError::InvalidConfig(
                "timeout must be at least 1 second".to_string(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}
