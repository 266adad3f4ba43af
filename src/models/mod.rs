use serde::{Deserialize, Serialize};

/// A single child entry discovered in a WebDAV directory listing.
///
/// Entries are built once during response parsing and never mutated
/// afterwards; the containing Vec is only reordered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Last path segment of the entry's href, trailing slash stripped.
    /// Never empty: the queried directory's self-entry is filtered out
    /// during parsing.
    pub name: String,
    /// True when the entry's resourcetype carries a collection marker.
    pub is_directory: bool,
    /// Value of getcontentlength; 0 when the property is absent or empty
    /// (collections typically report no size).
    pub size_bytes: u64,
    /// getlastmodified reformatted as `YYYY-MM-DD HH:MM:SS` when it parses
    /// as an RFC 1123 date, the raw property text when it does not, or the
    /// literal `Unknown` when the property is missing.
    pub modified_at: String,
}
