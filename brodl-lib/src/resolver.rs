//! Resolves a workshop id into a direct file URL via the third-party
//! mirror's view page.

use regex::Regex;

use crate::client::PageSource;
use crate::error::Error;

const VIEW_URL: &str = "http://steamworkshop.download/download/view";

/// A direct download extracted from a mirror view page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    pub url: String,
    /// File extension advertised next to the link, without the dot.
    pub extension: String,
}

pub fn view_url(workshop_id: u64) -> String {
    format!("{VIEW_URL}/{workshop_id}")
}

/// Extracts download candidates from mirror view pages.
pub struct Resolver {
    filename: Regex,
    link: Regex,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            filename: Regex::new(r"Filename:\s*([^<\r\n]+)").expect("invalid filename pattern"),
            link: Regex::new(r#"<a[^>]+href="([^"]+)"[^>]*>\s*Download:"#)
                .expect("invalid download link pattern"),
        }
    }

    /// Fetch and parse the view page for a workshop id.
    ///
    /// The page advertises the original filename (whose extension we keep so
    /// non-map uploads stay recognizable) and a download anchor. Either one
    /// missing is a `Resolution` error; the caller decides whether that ends
    /// the run or just skips the map.
    pub fn resolve<S: PageSource>(&self, source: &S, workshop_id: u64) -> Result<ResolvedDownload, Error> {
        let fetched = source.page(&view_url(workshop_id))?;
        if !fetched.is_success() {
            return Err(Error::resolution(format!(
                "view page for {workshop_id}: HTTP {}",
                fetched.status
            )));
        }
        self.parse(&fetched.body, workshop_id)
    }

    fn parse(&self, body: &str, workshop_id: u64) -> Result<ResolvedDownload, Error> {
        let extension = self
            .filename
            .captures_iter(body)
            .filter_map(|c| c.get(1))
            .find_map(|m| extension_of(m.as_str().trim()))
            .ok_or_else(|| {
                Error::resolution(format!("filename not found on view page for {workshop_id}"))
            })?;
        let url = self
            .link
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                Error::resolution(format!(
                    "download link not found on view page for {workshop_id}"
                ))
            })?;
        Ok(ResolvedDownload { url, extension })
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension after the last dot, only if it is plain alphanumeric. Filters
/// out prose that merely contains the word "Filename:".
fn extension_of(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
