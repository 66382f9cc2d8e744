//! Album batch orchestration.
//!
//! Pipeline per album: fetch album page → [`SiteAdapter::parse_album`] →
//! resolve every track page to a direct link → fan out one download per
//! link → collect one outcome per task. Only an album page failure is fatal;
//! every track-level failure becomes a `Failure` outcome.

mod fanout;
mod input;

pub use input::album_urls_from_text;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::KhdlConfig;
use crate::download::{self, DownloadOutcome, DownloadResult, DownloadTask, NameRegistry};
use crate::error::{FailureKind, FetchError};
use crate::extract::{AlbumListing, SiteAdapter};
use crate::http::HttpClient;
use crate::url_model::sanitize_dir_name;

use fanout::run_bounded;

/// Per-run knobs for the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// One directory per album is created below this root.
    pub download_root: PathBuf,
    /// Maximum track tasks in flight (None = one per track).
    pub max_concurrent: Option<usize>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            download_root: PathBuf::from("downloads"),
            max_concurrent: None,
        }
    }
}

impl From<&KhdlConfig> for BatchOptions {
    fn from(cfg: &KhdlConfig) -> Self {
        Self {
            download_root: cfg.download_root.clone(),
            max_concurrent: cfg.max_concurrent_downloads,
        }
    }
}

/// A track page and the direct link found on it for the requested extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackLink {
    pub track_page_url: String,
    pub resolved_download_url: Option<String>,
}

/// Everything one album batch produced.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub listing: AlbumListing,
    pub destination_dir: PathBuf,
    /// One outcome per attempted track, in track discovery order.
    pub outcomes: Vec<DownloadOutcome>,
    /// Tracks with no link for the requested extension.
    pub skipped: usize,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Result of one album in a multi-album run.
#[derive(Debug)]
pub struct AlbumRun {
    pub album_url: String,
    pub result: Result<BatchReport, FetchError>,
}

/// Drives album batches with one shared HTTP handle and site adapter.
#[derive(Clone)]
pub struct AlbumDownloader {
    client: HttpClient,
    adapter: Arc<dyn SiteAdapter>,
    options: BatchOptions,
}

impl AlbumDownloader {
    pub fn new(
        client: HttpClient,
        adapter: impl SiteAdapter + 'static,
        options: BatchOptions,
    ) -> Self {
        Self {
            client,
            adapter: Arc::new(adapter),
            options,
        }
    }

    /// Fetches and parses the album page. Errors here are fatal to the album.
    pub async fn fetch_listing(&self, album_url: &str) -> Result<AlbumListing, FetchError> {
        let html = self.client.fetch_text(album_url).await?;
        Ok(self.adapter.parse_album(&html, album_url))
    }

    /// Resolves every track page of `listing` to its direct link for
    /// `extension`, concurrently. Results are in track order.
    pub async fn resolve_tracks(
        &self,
        listing: &AlbumListing,
        extension: &str,
    ) -> Vec<(String, Result<TrackLink, FetchError>)> {
        let urls = listing.track_page_urls.clone();
        let slots = run_bounded(urls.clone(), self.options.max_concurrent, |track_page_url| {
            let client = self.client.clone();
            let adapter = Arc::clone(&self.adapter);
            let extension = extension.to_string();
            async move {
                let html = client.fetch_text(&track_page_url).await?;
                let resolved_download_url = adapter.parse_download_link(&html, &extension);
                Ok::<_, FetchError>(TrackLink {
                    track_page_url,
                    resolved_download_url,
                })
            }
        })
        .await;

        urls.into_iter()
            .zip(slots)
            .map(|(url, slot)| {
                let res = slot.unwrap_or_else(|| {
                    Err(FetchError::Join("track page task did not complete".to_string()))
                });
                (url, res)
            })
            .collect()
    }

    /// Downloads every track of one album whose page links a file ending
    /// with `extension`.
    ///
    /// Fails only if the album page itself cannot be fetched. Each track page
    /// or download failure is reported as a `Failure` outcome and never
    /// cancels other tracks. Tracks without a matching link produce no outcome.
    pub async fn run_album_download(
        &self,
        album_url: &str,
        extension: &str,
    ) -> Result<BatchReport, FetchError> {
        let listing = self.fetch_listing(album_url).await?;
        let destination_dir = self
            .options
            .download_root
            .join(sanitize_dir_name(&listing.title));
        tracing::info!(
            album = %listing.title,
            tracks = listing.track_page_urls.len(),
            dir = %destination_dir.display(),
            "album listing parsed"
        );

        let task_for = |url: String| DownloadTask {
            url,
            destination_dir: destination_dir.clone(),
            requested_extension: extension.to_string(),
        };

        // Track index → outcome; sorted back into discovery order at the end.
        let mut outcomes: Vec<(usize, DownloadOutcome)> = Vec::new();
        let mut pending: Vec<(usize, DownloadTask)> = Vec::new();
        let mut skipped = 0usize;

        let resolved = self.resolve_tracks(&listing, extension).await;
        for (index, (track_page_url, res)) in resolved.into_iter().enumerate() {
            match res {
                Ok(TrackLink {
                    resolved_download_url: Some(url),
                    ..
                }) => pending.push((index, task_for(url))),
                Ok(TrackLink {
                    resolved_download_url: None,
                    ..
                }) => {
                    tracing::debug!(track = %track_page_url, extension, "no matching link, skipping");
                    skipped += 1;
                }
                Err(e) => {
                    tracing::warn!(track = %track_page_url, error = %e, "track page failed");
                    outcomes.push((index, DownloadOutcome::failure(task_for(track_page_url), &e)));
                }
            }
        }

        let tasks: Vec<DownloadTask> = pending.iter().map(|(_, t)| t.clone()).collect();
        let staged = run_bounded(tasks, self.options.max_concurrent, |task| {
            let client = self.client.clone();
            async move { download::stage(&client, &task).await }
        })
        .await;

        // Final names are reserved in track order, not completion order.
        let names = NameRegistry::new();
        for ((index, task), slot) in pending.into_iter().zip(staged) {
            let outcome = match slot {
                Some(res) => download::settle(task, res.and_then(|s| s.finalize(&names))),
                None => DownloadOutcome {
                    task,
                    result: DownloadResult::Failure {
                        kind: FailureKind::Worker,
                        message: "download task did not complete".to_string(),
                    },
                },
            };
            outcomes.push((index, outcome));
        }
        outcomes.sort_by_key(|(index, _)| *index);

        let report = BatchReport {
            listing,
            destination_dir,
            outcomes: outcomes.into_iter().map(|(_, o)| o).collect(),
            skipped,
        };
        tracing::info!(
            album = %report.listing.title,
            succeeded = report.succeeded(),
            failed = report.failed(),
            skipped = report.skipped,
            "album finished"
        );
        Ok(report)
    }

    /// Runs albums strictly one after another; a fatal error on one album
    /// does not stop the next.
    pub async fn run_album_batches(&self, album_urls: &[String], extension: &str) -> Vec<AlbumRun> {
        let mut runs = Vec::with_capacity(album_urls.len());
        for album_url in album_urls {
            let result = self.run_album_download(album_url, extension).await;
            if let Err(e) = &result {
                tracing::warn!(album = %album_url, error = %e, "album page failed");
            }
            runs.push(AlbumRun {
                album_url: album_url.clone(),
                result,
            });
        }
        runs
    }
}
