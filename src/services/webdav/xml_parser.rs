use chrono::DateTime;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;
use url::Url;

use super::error::WebDAVError;
use crate::models::DirectoryEntry;

/// Which property element the reader cursor is currently inside.
enum TextField {
    Href,
    ContentLength,
    LastModified,
}

/// Parses a PROPFIND multistatus body into one `DirectoryEntry` per
/// `response` element, in document order.
///
/// `base_path` is the URL path of the queried directory; the response
/// element describing the directory itself is excluded so the result holds
/// children only. Response elements without an href are skipped with a
/// warning rather than failing the whole listing.
pub fn parse_propfind_response(
    body: &str,
    base_path: &str,
) -> Result<Vec<DirectoryEntry>, WebDAVError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut depth: usize = 0;

    let mut in_response = false;
    let mut in_resourcetype = false;
    let mut field: Option<TextField> = None;

    let mut href: Option<String> = None;
    let mut is_collection = false;
    let mut content_length: Option<String> = None;
    let mut last_modified: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                match e.local_name().as_ref() {
                    b"response" => {
                        in_response = true;
                        in_resourcetype = false;
                        field = None;
                        href = None;
                        is_collection = false;
                        content_length = None;
                        last_modified = None;
                    }
                    b"resourcetype" if in_response => in_resourcetype = true,
                    b"collection" if in_resourcetype => is_collection = true,
                    b"href" if in_response => field = Some(TextField::Href),
                    b"getcontentlength" if in_response => field = Some(TextField::ContentLength),
                    b"getlastmodified" if in_response => field = Some(TextField::LastModified),
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => {
                // The usual shape is a self-closing <D:collection/> marker;
                // its presence alone makes the entry a directory.
                if in_resourcetype && e.local_name().as_ref() == b"collection" {
                    is_collection = true;
                }
            }
            Ok(Event::End(e)) => {
                depth = depth.saturating_sub(1);
                match e.local_name().as_ref() {
                    b"response" => {
                        in_response = false;
                        if let Some(entry) = build_entry(
                            href.take(),
                            is_collection,
                            content_length.take(),
                            last_modified.take(),
                            base_path,
                        )? {
                            entries.push(entry);
                        }
                    }
                    b"resourcetype" => in_resourcetype = false,
                    b"href" | b"getcontentlength" | b"getlastmodified" => field = None,
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(ref f) = field {
                    let text = e
                        .unescape()
                        .map_err(|err| WebDAVError::Xml(err.to_string()))?
                        .into_owned();
                    let slot = match f {
                        TextField::Href => &mut href,
                        TextField::ContentLength => &mut content_length,
                        TextField::LastModified => &mut last_modified,
                    };
                    match slot {
                        Some(existing) => existing.push_str(&text),
                        None => *slot = Some(text),
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(WebDAVError::Xml(e.to_string())),
        }
    }

    if depth != 0 {
        return Err(WebDAVError::Xml(
            "unexpected end of document inside an open element".to_string(),
        ));
    }

    Ok(entries)
}

fn build_entry(
    href: Option<String>,
    is_collection: bool,
    content_length: Option<String>,
    last_modified: Option<String>,
    base_path: &str,
) -> Result<Option<DirectoryEntry>, WebDAVError> {
    let href = match href {
        Some(h) => h,
        None => {
            warn!("skipping response element without an href");
            return Ok(None);
        }
    };

    let path = href_path(&href);

    // The server echoes the queried collection back as its own response
    // element; the listing holds children only.
    if path.trim_end_matches('/') == base_path.trim_end_matches('/') {
        return Ok(None);
    }

    let name = entry_name(&path);
    if name.is_empty() {
        return Ok(None);
    }

    let size_bytes = match content_length.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.parse::<u64>().map_err(|_| {
            WebDAVError::Xml(format!(
                "non-numeric getcontentlength '{}' for entry '{}'",
                text, name
            ))
        })?,
        _ => 0,
    };

    let modified_at = match last_modified {
        Some(raw) => match DateTime::parse_from_rfc2822(&raw) {
            Ok(parsed) => parsed.format("%Y-%m-%d %H:%M:%S").to_string(),
            // Unrecognized date formats degrade to the raw server text.
            Err(_) => raw,
        },
        None => "Unknown".to_string(),
    };

    Ok(Some(DirectoryEntry {
        name,
        is_directory: is_collection,
        size_bytes,
        modified_at,
    }))
}

/// Some servers return absolute URLs in href elements; reduce those to the
/// path component so they compare against the queried path.
fn href_path(href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        match Url::parse(href) {
            Ok(url) => url.path().to_string(),
            Err(_) => href.to_string(),
        }
    } else {
        href.to_string()
    }
}

/// Last path segment with any trailing slash stripped, percent-decoded.
fn entry_name(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    match urlencoding::decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCS_LISTING: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:multistatus xmlns:d="DAV:">
    <d:response>
        <d:href>/docs/</d:href>
        <d:propstat>
            <d:prop>
                <d:resourcetype><d:collection/></d:resourcetype>
                <d:getlastmodified>Fri, 01 May 2020 09:00:00 GMT</d:getlastmodified>
            </d:prop>
            <d:status>HTTP/1.1 200 OK</d:status>
        </d:propstat>
    </d:response>
    <d:response>
        <d:href>/docs/report.pdf</d:href>
        <d:propstat>
            <d:prop>
                <d:resourcetype/>
                <d:getcontentlength>2048</d:getcontentlength>
                <d:getlastmodified>Fri, 01 May 2020 10:00:00 GMT</d:getlastmodified>
            </d:prop>
            <d:status>HTTP/1.1 200 OK</d:status>
        </d:propstat>
    </d:response>
</d:multistatus>"#;

    #[test]
    fn test_self_entry_is_skipped() {
        let entries = parse_propfind_response(DOCS_LISTING, "/docs/").expect("parse failed");
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.name, "report.pdf");
        assert!(!entry.is_directory);
        assert_eq!(entry.size_bytes, 2048);
        assert_eq!(entry.modified_at, "2020-05-01 10:00:00");
    }

    #[test]
    fn test_names_are_never_empty() {
        let entries = parse_propfind_response(DOCS_LISTING, "/docs/").expect("parse failed");
        assert!(entries.iter().all(|e| !e.name.is_empty()));
    }

    #[test]
    fn test_collection_marker_sets_directory_flag() {
        let xml = r#"<d:multistatus xmlns:d="DAV:">
            <d:response>
                <d:href>/docs/archive/</d:href>
                <d:propstat><d:prop>
                    <d:resourcetype><d:collection/></d:resourcetype>
                </d:prop></d:propstat>
            </d:response>
        </d:multistatus>"#;
        let entries = parse_propfind_response(xml, "/docs/").expect("parse failed");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "archive");
        assert!(entries[0].is_directory);
        // directories typically report no size
        assert_eq!(entries[0].size_bytes, 0);
    }

    #[test]
    fn test_empty_collection_element_still_counts() {
        let xml = r#"<d:multistatus xmlns:d="DAV:">
            <d:response>
                <d:href>/docs/archive/</d:href>
                <d:propstat><d:prop>
                    <d:resourcetype><d:collection></d:collection></d:resourcetype>
                </d:prop></d:propstat>
            </d:response>
        </d:multistatus>"#;
        let entries = parse_propfind_response(xml, "/docs/").expect("parse failed");
        assert!(entries[0].is_directory);
    }

    #[test]
    fn test_missing_properties_get_defaults() {
        let xml = r#"<d:multistatus xmlns:d="DAV:">
            <d:response>
                <d:href>/docs/notes.txt</d:href>
            </d:response>
        </d:multistatus>"#;
        let entries = parse_propfind_response(xml, "/docs/").expect("parse failed");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].size_bytes, 0);
        assert_eq!(entries[0].modified_at, "Unknown");
        assert!(!entries[0].is_directory);
    }

    #[test]
    fn test_unparsable_date_falls_back_to_raw_text() {
        let xml = r#"<d:multistatus xmlns:d="DAV:">
            <d:response>
                <d:href>/docs/odd.bin</d:href>
                <d:propstat><d:prop>
                    <d:getlastmodified>garbage-date</d:getlastmodified>
                </d:prop></d:propstat>
            </d:response>
        </d:multistatus>"#;
        let entries = parse_propfind_response(xml, "/docs/").expect("parse failed");
        assert_eq!(entries[0].modified_at, "garbage-date");
    }

    #[test]
    fn test_rfc1123_date_is_reformatted() {
        let xml = r#"<d:multistatus xmlns:d="DAV:">
            <d:response>
                <d:href>/docs/a.txt</d:href>
                <d:propstat><d:prop>
                    <d:getlastmodified>Mon, 12 Jan 2020 12:34:56 GMT</d:getlastmodified>
                </d:prop></d:propstat>
            </d:response>
        </d:multistatus>"#;
        let entries = parse_propfind_response(xml, "/docs/").expect("parse failed");
        assert_eq!(entries[0].modified_at, "2020-01-12 12:34:56");
    }

    #[test]
    fn test_response_without_href_is_skipped() {
        let xml = r#"<d:multistatus xmlns:d="DAV:">
            <d:response>
                <d:propstat><d:prop>
                    <d:getcontentlength>10</d:getcontentlength>
                </d:prop></d:propstat>
            </d:response>
            <d:response>
                <d:href>/docs/kept.txt</d:href>
            </d:response>
        </d:multistatus>"#;
        let entries = parse_propfind_response(xml, "/docs/").expect("parse failed");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "kept.txt");
    }

    #[test]
    fn test_non_numeric_size_is_a_parse_error() {
        let xml = r#"<d:multistatus xmlns:d="DAV:">
            <d:response>
                <d:href>/docs/bad.txt</d:href>
                <d:propstat><d:prop>
                    <d:getcontentlength>not-a-number</d:getcontentlength>
                </d:prop></d:propstat>
            </d:response>
        </d:multistatus>"#;
        let result = parse_propfind_response(xml, "/docs/");
        assert!(matches!(result, Err(WebDAVError::Xml(_))));
    }

    #[test]
    fn test_truncated_document_is_a_parse_error() {
        let xml = r#"<d:multistatus xmlns:d="DAV:"><d:response><d:href>/docs/a.txt"#;
        let result = parse_propfind_response(xml, "/docs/");
        assert!(matches!(result, Err(WebDAVError::Xml(_))));
    }

    #[test]
    fn test_entries_keep_document_order() {
        let xml = r#"<d:multistatus xmlns:d="DAV:">
            <d:response><d:href>/docs/zeta.txt</d:href></d:response>
            <d:response><d:href>/docs/alpha.txt</d:href></d:response>
        </d:multistatus>"#;
        let entries = parse_propfind_response(xml, "/docs/").expect("parse failed");
        assert_eq!(entries[0].name, "zeta.txt");
        assert_eq!(entries[1].name, "alpha.txt");
    }

    #[test]
    fn test_percent_encoded_names_are_decoded() {
        let xml = r#"<d:multistatus xmlns:d="DAV:">
            <d:response><d:href>/docs/quarterly%20report.pdf</d:href></d:response>
        </d:multistatus>"#;
        let entries = parse_propfind_response(xml, "/docs/").expect("parse failed");
        assert_eq!(entries[0].name, "quarterly report.pdf");
    }

    #[test]
    fn test_absolute_url_hrefs_are_handled() {
        let xml = r#"<d:multistatus xmlns:d="DAV:">
            <d:response><d:href>https://dav.example.com/docs/</d:href></d:response>
            <d:response><d:href>https://dav.example.com/docs/a.txt</d:href></d:response>
        </d:multistatus>"#;
        let entries = parse_propfind_response(xml, "/docs/").expect("parse failed");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.txt");
    }

    #[test]
    fn test_non_multistatus_document_yields_no_entries() {
        let entries =
            parse_propfind_response("<html><body>hi</body></html>", "/docs/").expect("parse failed");
        assert!(entries.is_empty());
    }
}
