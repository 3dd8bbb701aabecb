//! Local inventory: which workshop ids are already on disk.

use std::collections::HashSet;
use std::path::Path;

use brodl_core::ArtifactName;

use crate::error::Error;

/// Recursively collect the workshop ids of every artifact under `root`.
///
/// Only the file name matters: any file whose second dash-separated field is
/// all digits counts, wherever the organizer may have moved it. A missing
/// root is an empty inventory, not an error (first run).
pub fn scan_existing_ids(root: &Path) -> Result<HashSet<u64>, Error> {
    let mut ids = HashSet::new();
    if !root.exists() {
        return Ok(ids);
    }
    collect(root, &mut ids)?;
    Ok(ids)
}

fn collect(dir: &Path, ids: &mut HashSet<u64>) -> Result<(), Error> {
    for entry in std::fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(&path, ids)?;
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(id) = ArtifactName::parse_workshop_id(name).and_then(|d| d.parse::<u64>().ok())
        {
            ids.insert(id);
        }
    }
    Ok(())
}
