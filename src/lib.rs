//! davls — list the contents of a WebDAV directory.
//!
//! One PROPFIND request with `Depth: 1`, parsed into typed entries and
//! rendered as a sorted, human-readable listing.

pub mod config;
pub mod listing;
pub mod models;
pub mod services;
