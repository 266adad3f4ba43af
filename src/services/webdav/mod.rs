// WebDAV client modules

pub mod common;
pub mod error;
pub mod service;
pub mod xml_parser;

// Re-export main types for convenience
pub use error::WebDAVError;
pub use service::WebDAVService;
pub use xml_parser::parse_propfind_response;
