//! Minimal `PROPFIND` multistatus parsing: hrefs, collection flags, and the
//! passthrough size/mtime props. Namespace prefixes vary by server, so
//! elements are matched by local name only.

use anyhow::{Result, bail};
use quick_xml::Reader;
use quick_xml::events::Event;

/// One `<response>` element, still in wire form: the href is whatever the
/// server sent, percent-encoding included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct RawResource {
    pub href: String,
    pub is_collection: bool,
    pub size: Option<u64>,
    pub modified: Option<String>,
}

pub(super) fn parse_multistatus(body: &str) -> Result<Vec<RawResource>> {
    let mut reader = Reader::from_reader(body.as_bytes());
    reader.config_mut().trim_text(true);

    let mut resources = Vec::new();
    let mut current: Option<RawResource> = None;
    let mut current_element: Option<String> = None;
    let mut saw_multistatus = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match name.as_str() {
                    "multistatus" => saw_multistatus = true,
                    "response" => current = Some(RawResource::default()),
                    "collection" => {
                        if let Some(ref mut resource) = current {
                            resource.is_collection = true;
                        }
                    }
                    _ => current_element = Some(name),
                }
            }
            Ok(Event::Text(ref e)) => {
                let (Some(resource), Some(element)) = (current.as_mut(), current_element.as_ref())
                else {
                    buf.clear();
                    continue;
                };
                let text = match e.unescape() {
                    Ok(text) => text.trim().to_string(),
                    Err(_) => {
                        buf.clear();
                        continue;
                    }
                };
                if text.is_empty() {
                    buf.clear();
                    continue;
                }
                match element.as_str() {
                    "href" => resource.href = text,
                    "getcontentlength" => resource.size = text.parse().ok(),
                    "getlastmodified" => resource.modified = Some(text),
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "response" {
                    if let Some(resource) = current.take() {
                        if !resource.href.is_empty() {
                            resources.push(resource);
                        }
                    }
                } else {
                    current_element = None;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => bail!("invalid multistatus body: {e}"),
            _ => {}
        }
        buf.clear();
    }

    if !saw_multistatus {
        bail!("response body is not a multistatus document");
    }
    Ok(resources)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<D:multistatus xmlns:D="DAV:">
  <D:response>
    <D:href>/dav/Shows/</D:href>
    <D:propstat>
      <D:prop>
        <D:resourcetype><D:collection/></D:resourcetype>
        <D:getlastmodified>Tue, 01 Jul 2025 10:00:00 GMT</D:getlastmodified>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
  <D:response>
    <D:href>/dav/Shows/ep%201.mp4</D:href>
    <D:propstat>
      <D:prop>
        <D:resourcetype/>
        <D:getcontentlength>1048576</D:getcontentlength>
        <D:getlastmodified>Tue, 01 Jul 2025 11:00:00 GMT</D:getlastmodified>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>"#;

    #[test]
    fn parses_collections_and_files() {
        let resources = parse_multistatus(BODY).unwrap();
        assert_eq!(resources.len(), 2);

        assert_eq!(resources[0].href, "/dav/Shows/");
        assert!(resources[0].is_collection);
        assert_eq!(resources[0].size, None);

        assert_eq!(resources[1].href, "/dav/Shows/ep%201.mp4");
        assert!(!resources[1].is_collection);
        assert_eq!(resources[1].size, Some(1_048_576));
        assert_eq!(
            resources[1].modified.as_deref(),
            Some("Tue, 01 Jul 2025 11:00:00 GMT")
        );
    }

    #[test]
    fn tolerates_foreign_namespace_prefixes() {
        let body = BODY.replace("D:", "lp1:").replace("xmlns:D=", "xmlns:lp1=");
        let resources = parse_multistatus(&body).unwrap();
        assert_eq!(resources.len(), 2);
        assert!(resources[0].is_collection);
    }

    #[test]
    fn unescapes_entities_in_hrefs() {
        let body = r#"<D:multistatus xmlns:D="DAV:">
          <D:response><D:href>/dav/Tom &amp; Jerry.mp4</D:href></D:response>
        </D:multistatus>"#;
        let resources = parse_multistatus(body).unwrap();
        assert_eq!(resources[0].href, "/dav/Tom & Jerry.mp4");
    }

    #[test]
    fn non_multistatus_body_is_an_error() {
        assert!(parse_multistatus("<html><body>login</body></html>").is_err());
        assert!(parse_multistatus("garbage").is_err());
    }
}
