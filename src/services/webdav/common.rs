/// Common utilities shared by the WebDAV request path.

/// Build a standardized User-Agent string for all WebDAV requests.
pub fn build_user_agent() -> String {
    format!("davls/{} (WebDAV-Listing)", env!("CARGO_PKG_VERSION"))
}
