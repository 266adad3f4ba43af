use reqwest::{Client, Method};
use tracing::{debug, info};
use url::Url;

use super::common::build_user_agent;
use super::error::WebDAVError;
use super::xml_parser::parse_propfind_response;
use crate::config::Config;
use crate::models::DirectoryEntry;

/// WebDAV client that lists a single directory with one PROPFIND request.
pub struct WebDAVService {
    client: Client,
    config: Config,
}

impl WebDAVService {
    pub fn new(config: Config) -> Result<Self, WebDAVError> {
        config.validate()?;

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self { client, config })
    }

    /// Fetches and parses the directory listing for the configured URL.
    pub async fn list_directory(&self) -> Result<Vec<DirectoryEntry>, WebDAVError> {
        let body = self.fetch_listing().await?;

        // Config validation guarantees the URL parses; fall back to the
        // root path rather than panicking if it somehow does not.
        let base_path = Url::parse(&self.config.url)
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| "/".to_string());

        let entries = parse_propfind_response(&body, &base_path)?;
        info!(
            "Found {} entries in directory: {}",
            entries.len(),
            self.config.url
        );
        Ok(entries)
    }

    /// Issues the PROPFIND request and returns the raw multistatus body.
    async fn fetch_listing(&self) -> Result<String, WebDAVError> {
        let propfind_body = r#"<?xml version="1.0" encoding="utf-8"?>
            <D:propfind xmlns:D="DAV:">
                <D:prop>
                    <D:getcontentlength/>
                    <D:getlastmodified/>
                    <D:resourcetype/>
                </D:prop>
            </D:propfind>"#;

        let method = Method::from_bytes(b"PROPFIND")
            .map_err(|e| WebDAVError::InvalidConfig(format!("invalid HTTP method: {}", e)))?;

        debug!("📤 Sending PROPFIND request to URL: {}", self.config.url);

        let response = self
            .client
            .request(method, &self.config.url)
            .basic_auth(&self.config.username, Some(&self.config.token))
            .header("User-Agent", build_user_agent())
            .header("Depth", "1")
            .header("Content-Type", "application/xml")
            .body(propfind_body)
            .send()
            .await?;

        let status = response.status();
        if !(status.is_success() || status.as_u16() == 207) {
            let body = response.text().await.unwrap_or_default();
            return Err(WebDAVError::Http { status, body });
        }

        debug!(
            "✅ PROPFIND successful: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );
        Ok(response.text().await?)
    }
}
