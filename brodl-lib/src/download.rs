//! Streams a resolved download to disk.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::client::HttpFetcher;
use crate::error::Error;

/// Result of one download attempt against the mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// File is on disk under its final name.
    Saved { bytes: u64 },
    /// The mirror answered but refused; nothing was written.
    Refused { status: u16 },
}

/// Download `url` into `dest`, going through the retrying fetcher.
///
/// The body is streamed into a `.part` sibling first and renamed into place
/// once complete, so an interrupted transfer never leaves a file the
/// inventory scan would mistake for a finished map.
pub fn materialize(fetcher: &HttpFetcher, url: &str, dest: &Path) -> Result<DownloadOutcome, Error> {
    let mut response = fetcher.fetch(url)?;
    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Ok(DownloadOutcome::Refused {
            status: status.as_u16(),
        });
    }

    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let part = part_path(dest);
    let mut file = File::create(&part)?;
    let bytes = match response.copy_to(&mut file) {
        Ok(bytes) => bytes,
        Err(err) => {
            drop(file);
            let _ = std::fs::remove_file(&part);
            return Err(err.into());
        }
    };
    drop(file);
    std::fs::rename(&part, dest)?;

    Ok(DownloadOutcome::Saved { bytes })
}

/// `dest` with `.part` appended to the full file name, keeping the real
/// extension intact.
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
