//! The end-to-end run: inventory, listing walk, downloads, organize, dedup.

use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;

use brodl_core::ArtifactName;

use crate::client::HttpFetcher;
use crate::config::Config;
use crate::download::{materialize, DownloadOutcome};
use crate::error::Error;
use crate::inventory::scan_existing_ids;
use crate::listing::{enumerate, MapListing};
use crate::organize::{
    find_duplicates, organize_files, quarantine_duplicates, DedupSummary, OrganizeSummary,
};
use crate::resolver::Resolver;

/// Progress notifications, consumed by the CLI to drive its spinner.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    ScanPage { current: u32, total: u32 },
    Discovered { count: usize },
    Downloading { index: usize, total: usize, title: String },
    Downloaded { title: String, bytes: u64 },
    DownloadFailed { title: String, reason: String },
    Organizing,
    Deduplicating,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory the maps live in.
    pub root: PathBuf,
    /// Sleep one to two seconds between downloads to go easy on the mirror.
    pub polite_pause: bool,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub discovered: usize,
    pub downloaded: usize,
    pub failed: usize,
    pub organized: OrganizeSummary,
    pub dedup: DedupSummary,
}

#[derive(Debug)]
pub enum RunOutcome {
    /// Every listed map was already on disk (or nothing was listed at all).
    NoNewMaps,
    Completed(RunSummary),
}

/// Run the whole pipeline once.
///
/// Network trouble is scoped to the page or map it hit: the affected item is
/// logged and skipped, the run continues. Filesystem errors outside a single
/// download abort the run.
pub fn run<F>(
    fetcher: &HttpFetcher,
    config: &Config,
    options: &RunOptions,
    mut on_event: F,
) -> Result<RunOutcome, Error>
where
    F: FnMut(PipelineEvent),
{
    let existing = scan_existing_ids(&options.root)?;
    log::info!("{} map(s) already on disk", existing.len());

    let listings = enumerate(fetcher, config, &existing, |current, total| {
        on_event(PipelineEvent::ScanPage { current, total })
    })?;
    if listings.is_empty() {
        return Ok(RunOutcome::NoNewMaps);
    }
    on_event(PipelineEvent::Discovered {
        count: listings.len(),
    });

    let resolver = Resolver::new();
    let mut summary = RunSummary {
        discovered: listings.len(),
        ..RunSummary::default()
    };

    let total = listings.len();
    for (i, listing) in listings.iter().enumerate() {
        on_event(PipelineEvent::Downloading {
            index: i + 1,
            total,
            title: listing.title.clone(),
        });

        match download_one(fetcher, &resolver, listing, options) {
            Ok(bytes) => {
                summary.downloaded += 1;
                on_event(PipelineEvent::Downloaded {
                    title: listing.title.clone(),
                    bytes,
                });
            }
            Err(err) => {
                summary.failed += 1;
                log::warn!("map {} ({}): {err}", listing.workshop_id, listing.title);
                on_event(PipelineEvent::DownloadFailed {
                    title: listing.title.clone(),
                    reason: err.to_string(),
                });
            }
        }

        if options.polite_pause && i + 1 < total {
            let secs = rand::thread_rng().gen_range(1..=2);
            std::thread::sleep(Duration::from_secs(secs));
        }
    }

    on_event(PipelineEvent::Organizing);
    summary.organized = organize_files(&options.root)?;

    on_event(PipelineEvent::Deduplicating);
    let groups = find_duplicates(&options.root)?;
    summary.dedup = quarantine_duplicates(&options.root, &groups)?;

    Ok(RunOutcome::Completed(summary))
}

/// Resolve and materialize a single map. Any failure only affects this map.
fn download_one(
    fetcher: &HttpFetcher,
    resolver: &Resolver,
    listing: &MapListing,
    options: &RunOptions,
) -> Result<u64, Error> {
    let resolved = resolver.resolve(fetcher, listing.workshop_id)?;
    let name = ArtifactName::new(
        listing.prefix(),
        listing.workshop_id.to_string(),
        &listing.title,
        resolved.extension,
    );
    let dest = options.root.join(name.file_name());
    match materialize(fetcher, &resolved.url, &dest)? {
        DownloadOutcome::Saved { bytes } => Ok(bytes),
        DownloadOutcome::Refused { status } => Err(Error::resolution(format!(
            "mirror refused the download with HTTP {status}"
        ))),
    }
}
