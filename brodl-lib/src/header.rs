//! Campaign header parsing.
//!
//! A Broforce map file starts with a small XML `<CampaignHeader>` document
//! before the binary payload. The duplicate scan reads the author out of it;
//! everything here is best effort, since plenty of files in the wild carry a
//! truncated or garbled header.

use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

/// How many leading bytes to search for the header document.
const HEADER_WINDOW: usize = 1024;

const XML_START: &[u8] = b"<?xml";
const XML_END: &[u8] = b"</CampaignHeader>";

/// Metadata embedded at the start of a map file. Every field is optional:
/// the header carries whatever the editor that produced the map wrote.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MapHeader {
    pub name: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub length: Option<String>,
    pub md5: Option<String>,
    pub has_brotality_scoreboard: Option<String>,
    pub has_time_scoreboard: Option<String>,
    pub game_mode: Option<String>,
}

impl MapHeader {
    /// Author credited in the header, or the placeholder the duplicate
    /// report uses when there is none.
    pub fn author_or_unknown(&self) -> &str {
        match self.author.as_deref() {
            Some(author) if !author.is_empty() => author,
            _ => "<unknown>",
        }
    }
}

/// Read and parse the header of the map file at `path`.
///
/// Returns `None` when the file can't be read, the header markers aren't
/// inside the first kilobyte, or the XML doesn't parse. Callers treat all of
/// those the same way: the map simply has no usable header.
pub fn read_header(path: &Path) -> Option<MapHeader> {
    let mut file = std::fs::File::open(path).ok()?;
    let mut prefix = vec![0u8; HEADER_WINDOW];
    let mut filled = 0;
    while filled < prefix.len() {
        match file.read(&mut prefix[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(_) => return None,
        }
    }
    parse_header(&prefix[..filled])
}

/// Locate the XML document inside a raw byte prefix and parse it.
pub fn parse_header(prefix: &[u8]) -> Option<MapHeader> {
    let start = find(prefix, XML_START)?;
    let end = find(&prefix[start..], XML_END)? + start + XML_END.len();
    let xml = String::from_utf8_lossy(&prefix[start..end]).into_owned();

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut header = MapHeader::default();
    let mut current_tag = String::new();
    loop {
        match reader.read_event().ok()? {
            Event::Start(ref e) => {
                current_tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
            }
            Event::Text(ref e) => {
                let text = e.unescape().ok()?.to_string();
                match current_tag.as_str() {
                    "name" => header.name = Some(text),
                    "author" => header.author = Some(text),
                    "description" => header.description = Some(text),
                    "length" => header.length = Some(text),
                    "md5" => header.md5 = Some(text),
                    "hasBrotalityScoreboard" => header.has_brotality_scoreboard = Some(text),
                    "hasTimeScoreBoard" => header.has_time_scoreboard = Some(text),
                    "gameMode" => header.game_mode = Some(text),
                    _ => {}
                }
            }
            Event::End(_) => current_tag.clear(),
            Event::Eof => break,
            _ => {}
        }
    }

    Some(header)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER_XML: &str = r#"<?xml version="1.0" encoding="utf-16"?>
<CampaignHeader xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <name>City Under Siege</name>
  <author>bro_mapper</author>
  <description>Fight through the city.</description>
  <length>12</length>
  <md5>d41d8cd98f00b204e9800998ecf8427e</md5>
  <hasBrotalityScoreboard>true</hasBrotalityScoreboard>
  <hasTimeScoreBoard>false</hasTimeScoreBoard>
  <gameMode>Campaign</gameMode>
</CampaignHeader>"#;

    #[test]
    fn parses_all_fields() {
        let mut bytes = HEADER_XML.as_bytes().to_vec();
        bytes.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        let header = parse_header(&bytes).unwrap();
        assert_eq!(header.name.as_deref(), Some("City Under Siege"));
        assert_eq!(header.author.as_deref(), Some("bro_mapper"));
        assert_eq!(header.length.as_deref(), Some("12"));
        assert_eq!(header.has_brotality_scoreboard.as_deref(), Some("true"));
        assert_eq!(header.has_time_scoreboard.as_deref(), Some("false"));
        assert_eq!(header.game_mode.as_deref(), Some("Campaign"));
        assert_eq!(header.author_or_unknown(), "bro_mapper");
    }

    #[test]
    fn header_may_start_past_a_binary_preamble() {
        let mut bytes = vec![0x42u8, 0x46, 0x47, 0x00];
        bytes.extend_from_slice(HEADER_XML.as_bytes());
        let header = parse_header(&bytes).unwrap();
        assert_eq!(header.name.as_deref(), Some("City Under Siege"));
    }

    #[test]
    fn missing_markers_mean_no_header() {
        assert_eq!(parse_header(b"just some binary junk"), None);
        assert_eq!(parse_header(b"<?xml version=\"1.0\"?><name>x</name>"), None);
    }

    #[test]
    fn absent_author_falls_back_to_placeholder() {
        let xml = b"<?xml version=\"1.0\"?><CampaignHeader><name>Untitled</name></CampaignHeader>";
        let header = parse_header(xml).unwrap();
        assert_eq!(header.author, None);
        assert_eq!(header.author_or_unknown(), "<unknown>");
    }
}
