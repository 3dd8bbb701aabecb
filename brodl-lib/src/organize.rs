//! Post-download passes: star-rating buckets and duplicate quarantine.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use brodl_core::filename::star_digit_of;
use brodl_core::ArtifactName;

use crate::error::Error;
use crate::header::read_header;

const FIVE_STAR_DIR: &str = "5 Stars";
const FOUR_STAR_DIR: &str = "4 Stars";
const THREE_OR_LESS_DIR: &str = "3 Stars and less";
const NON_MAP_DIR: &str = "non-bfg";
const DUPLICATES_DIR: &str = "duplicates";
const REPORT_NAME: &str = "@duplicates.txt";

/// Counts from one organize pass, per bucket.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OrganizeSummary {
    pub five_star: usize,
    pub four_star: usize,
    pub three_or_less: usize,
    pub non_map: usize,
}

impl OrganizeSummary {
    pub fn total(&self) -> usize {
        self.five_star + self.four_star + self.three_or_less + self.non_map
    }
}

/// Move loose files at the top of `root` into rating buckets.
///
/// Non-map files (anything not ending in `.bfg`) go to `non-bfg/`. Map files
/// are routed by the star digit at the end of their first `-`-field: `5` and
/// `4` get dedicated buckets, any other digit (or letter) lands in
/// `3 Stars and less/`. Names without the three `-`-fields stay where they
/// are. Subdirectories are never touched, so the pass is idempotent.
pub fn organize_files(root: &Path) -> Result<OrganizeSummary, Error> {
    for dir in [FIVE_STAR_DIR, FOUR_STAR_DIR, THREE_OR_LESS_DIR, NON_MAP_DIR] {
        std::fs::create_dir_all(root.join(dir))?;
    }

    let mut summary = OrganizeSummary::default();
    for entry in std::fs::read_dir(root)?.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let (bucket, count): (&str, &mut usize) = if !name.ends_with(".bfg") {
            (NON_MAP_DIR, &mut summary.non_map)
        } else {
            match star_digit_of(name) {
                Some('5') => (FIVE_STAR_DIR, &mut summary.five_star),
                Some('4') => (FOUR_STAR_DIR, &mut summary.four_star),
                Some(_) => (THREE_OR_LESS_DIR, &mut summary.three_or_less),
                None => continue,
            }
        };

        std::fs::rename(&path, root.join(bucket).join(name))?;
        *count += 1;
    }

    Ok(summary)
}

/// One file belonging to a duplicate group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateFile {
    pub workshop_id: u64,
    pub size: u64,
    pub path: PathBuf,
}

/// Maps sharing a (map name, author) identity.
///
/// Members are sorted by workshop id descending; the first one is the
/// canonical copy that stays put.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub map_name: String,
    pub author: String,
    pub members: Vec<DuplicateFile>,
}

impl DuplicateGroup {
    pub fn main(&self) -> &DuplicateFile {
        &self.members[0]
    }

    pub fn duplicates(&self) -> &[DuplicateFile] {
        &self.members[1..]
    }
}

/// Counts from one duplicate pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DedupSummary {
    pub groups: usize,
    pub quarantined: usize,
    pub quarantined_bytes: u64,
}

/// Find every group of maps under `root` that share a map name and author.
///
/// Identity comes from the filename (title fields rejoined) plus the author
/// read out of the embedded campaign header, `<unknown>` when there is none.
/// Files whose names don't carry a numeric workshop id are not considered.
/// Groups come back sorted by map name, then author.
pub fn find_duplicates(root: &Path) -> Result<Vec<DuplicateGroup>, Error> {
    let mut by_identity: BTreeMap<(String, String), Vec<DuplicateFile>> = BTreeMap::new();
    collect_maps(root, &mut by_identity)?;

    let mut groups = Vec::new();
    for ((map_name, author), mut members) in by_identity {
        if members.len() < 2 {
            continue;
        }
        members.sort_by(|a, b| b.workshop_id.cmp(&a.workshop_id));
        groups.push(DuplicateGroup {
            map_name,
            author,
            members,
        });
    }
    Ok(groups)
}

fn collect_maps(
    dir: &Path,
    by_identity: &mut BTreeMap<(String, String), Vec<DuplicateFile>>,
) -> Result<(), Error> {
    for entry in std::fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_maps(&path, by_identity)?;
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".bfg") {
            continue;
        }
        let Some(parsed) = ArtifactName::parse(name) else {
            continue;
        };
        let Ok(workshop_id) = parsed.workshop_id.parse::<u64>() else {
            continue;
        };
        let size = entry.metadata()?.len();
        let author = read_header(&path)
            .map(|h| h.author_or_unknown().to_string())
            .unwrap_or_else(|| "<unknown>".to_string());

        by_identity
            .entry((parsed.title, author))
            .or_default()
            .push(DuplicateFile {
                workshop_id,
                size,
                path,
            });
    }
    Ok(())
}

/// Move every non-canonical group member into `duplicates/` and write the
/// report alongside them.
pub fn quarantine_duplicates(
    root: &Path,
    groups: &[DuplicateGroup],
) -> Result<DedupSummary, Error> {
    let duplicates_dir = root.join(DUPLICATES_DIR);
    std::fs::create_dir_all(&duplicates_dir)?;

    let mut summary = DedupSummary {
        groups: groups.len(),
        ..DedupSummary::default()
    };
    for group in groups {
        for file in group.duplicates() {
            let Some(file_name) = file.path.file_name() else {
                continue;
            };
            let dest = duplicates_dir.join(file_name);
            if dest != file.path {
                std::fs::rename(&file.path, &dest)?;
            }
            summary.quarantined += 1;
            summary.quarantined_bytes += file.size;
        }
    }

    write_report(&duplicates_dir.join(REPORT_NAME), groups)?;
    Ok(summary)
}

fn write_report(path: &Path, groups: &[DuplicateGroup]) -> Result<(), Error> {
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "'{}' by {}", group.map_name, group.author)?;
        writeln!(
            out,
            "Main - ID {} - Size (B) {}",
            group.main().workshop_id,
            group.main().size
        )?;
        for file in group.duplicates() {
            writeln!(out, "Dupl - ID {} - Size (B) {}", file.workshop_id, file.size)?;
        }
    }
    out.flush()?;
    Ok(())
}
