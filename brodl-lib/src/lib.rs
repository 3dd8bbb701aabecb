//! Scan-fetch-dedup pipeline for Broforce workshop maps.
//!
//! The flow is strictly sequential: the listing enumerator walks the filtered
//! workshop pages, the resolver follows each item's indirection page to the
//! real download, the materializer writes artifacts under the filename
//! convention from `brodl-core`, and the organize/dedup passes sort the result
//! into star-rating buckets and quarantine duplicate maps.

pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod header;
pub mod inventory;
pub mod listing;
pub mod organize;
pub mod pipeline;
pub mod resolver;

pub use client::{FetchedPage, HttpFetcher, PageSource, RetryPolicy};
pub use config::Config;
pub use error::Error;
pub use header::MapHeader;
pub use listing::MapListing;
pub use organize::{DedupSummary, DuplicateGroup, OrganizeSummary};
pub use pipeline::{run, PipelineEvent, RunOptions, RunOutcome, RunSummary};

#[cfg(test)]
mod tests;
