pub mod config;
pub mod logging;

pub mod download;
pub mod error;
pub mod extract;
pub mod http;
pub mod pipeline;
pub mod url_model;

pub use download::{DownloadOutcome, DownloadResult, DownloadTask};
pub use error::{FailureKind, FetchError};
pub use extract::{AlbumListing, Khinsider, SiteAdapter};
pub use http::HttpClient;
pub use pipeline::{AlbumDownloader, AlbumRun, BatchOptions, BatchReport, TrackLink};
