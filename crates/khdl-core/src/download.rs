//! Download worker: one GET, one file.
//!
//! The body is streamed into a temp file inside the destination directory and
//! renamed to its final name only after a 2xx transfer completed, so a failed
//! task never leaves a file behind. Within an album batch the renames happen
//! in track order, so duplicate names are numbered deterministically.

use std::collections::HashSet;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempPath;

use crate::error::{FailureKind, FetchError};
use crate::http::HttpClient;
use crate::url_model::{derive_filename, NAME_MAX};

/// One file to fetch into `destination_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub url: String,
    pub destination_dir: PathBuf,
    pub requested_extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    Success { saved_path: PathBuf },
    Failure { kind: FailureKind, message: String },
}

/// Terminal result of one task; every task yields exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub task: DownloadTask,
    pub result: DownloadResult,
}

impl DownloadOutcome {
    pub fn failure(task: DownloadTask, err: &FetchError) -> Self {
        Self {
            task,
            result: DownloadResult::Failure {
                kind: err.kind(),
                message: err.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.result, DownloadResult::Success { .. })
    }

    pub fn saved_path(&self) -> Option<&Path> {
        match &self.result {
            DownloadResult::Success { saved_path } => Some(saved_path),
            DownloadResult::Failure { .. } => None,
        }
    }
}

/// Filenames already handed out within one album batch.
///
/// A second download resolving to the same sanitized name gets ` (2)`,
/// ` (3)`, ... inserted before its extension instead of overwriting.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    taken: Arc<Mutex<HashSet<String>>>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `name`, or the first free disambiguated variant of it.
    pub fn reserve(&self, name: &str) -> String {
        let mut taken = self.taken.lock().unwrap_or_else(|e| e.into_inner());
        if taken.insert(name.to_string()) {
            return name.to_string();
        }
        let mut n = 2u32;
        loop {
            let candidate = numbered(name, n);
            if taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// `song.mp3`, 2 → `song (2).mp3`, keeping the result within NAME_MAX chars.
fn numbered(name: &str, n: u32) -> String {
    let (stem, ext) = match name.rfind('.') {
        Some(i) if i > 0 => (&name[..i], &name[i..]),
        _ => (name, ""),
    };
    let suffix = format!(" ({}){}", n, ext);
    let room = NAME_MAX.saturating_sub(suffix.chars().count());
    let stem: String = stem.chars().take(room).collect();
    format!("{}{}", stem, suffix)
}

/// A fully transferred body waiting in its temp file for a final name.
pub(crate) struct StagedDownload {
    temp: TempPath,
    dir: PathBuf,
    name: String,
}

impl StagedDownload {
    /// Reserves the final name and renames the temp file onto it.
    pub(crate) fn finalize(self, names: &NameRegistry) -> Result<PathBuf, FetchError> {
        let name = names.reserve(&self.name);
        let final_path = self.dir.join(&name);
        self.temp
            .persist(&final_path)
            .map_err(|e| FetchError::Io(e.error))?;
        Ok(final_path)
    }
}

/// Fetches `task.url` into `task.destination_dir`. Never fails: errors become
/// a `Failure` outcome.
pub async fn download(
    client: &HttpClient,
    task: DownloadTask,
    names: &NameRegistry,
) -> DownloadOutcome {
    let res = match stage(client, &task).await {
        Ok(staged) => staged.finalize(names),
        Err(e) => Err(e),
    };
    settle(task, res)
}

/// Turns a finished (or failed) task into its outcome and logs it.
pub(crate) fn settle(task: DownloadTask, res: Result<PathBuf, FetchError>) -> DownloadOutcome {
    match res {
        Ok(saved_path) => {
            tracing::info!(url = %task.url, path = %saved_path.display(), "downloaded");
            DownloadOutcome {
                task,
                result: DownloadResult::Success { saved_path },
            }
        }
        Err(e) => {
            tracing::warn!(url = %task.url, error = %e, "download failed");
            DownloadOutcome::failure(task, &e)
        }
    }
}

/// Transfers `task.url` into a temp file in the destination directory
/// without giving it its final name yet.
pub(crate) async fn stage(
    client: &HttpClient,
    task: &DownloadTask,
) -> Result<StagedDownload, FetchError> {
    tokio::fs::create_dir_all(&task.destination_dir).await?;

    let client = client.clone();
    let url = task.url.clone();
    let dir = task.destination_dir.clone();
    tokio::task::spawn_blocking(move || fetch_blocking(&client, &url, dir)).await?
}

fn fetch_blocking(
    client: &HttpClient,
    url: &str,
    dir: PathBuf,
) -> Result<StagedDownload, FetchError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".khdl-").suffix(".part");
    // Same mode as a plain create: 0666 minus the umask, not tempfile's 0600.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    // Dropping `temp` on any early return removes the partial file.
    let mut temp = builder.tempfile_in(&dir)?;

    let headers = {
        let mut writer = BufWriter::new(temp.as_file_mut());
        let headers = client.get_to_writer(url, &mut writer)?;
        writer.flush()?;
        headers
    };
    temp.as_file().sync_all()?;

    let name = derive_filename(url, headers.content_disposition.as_deref());
    tracing::debug!(
        url,
        bytes = headers.content_length,
        name = %name,
        "transfer complete"
    );
    Ok(StagedDownload {
        temp: temp.into_temp_path(),
        dir,
        name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_disambiguates_duplicates() {
        let names = NameRegistry::new();
        assert_eq!(names.reserve("song.mp3"), "song.mp3");
        assert_eq!(names.reserve("song.mp3"), "song (2).mp3");
        assert_eq!(names.reserve("song.mp3"), "song (3).mp3");
        assert_eq!(names.reserve("other.mp3"), "other.mp3");
    }

    #[test]
    fn registry_is_shared_between_clones() {
        let a = NameRegistry::new();
        let b = a.clone();
        assert_eq!(a.reserve("x.flac"), "x.flac");
        assert_eq!(b.reserve("x.flac"), "x (2).flac");
    }

    #[test]
    fn numbered_without_extension_or_dotfile() {
        assert_eq!(numbered("README", 2), "README (2)");
        assert_eq!(numbered(".hidden", 2), ".hidden (2)");
        assert_eq!(numbered("a.tar.gz", 4), "a.tar (4).gz");
    }

    #[test]
    fn numbered_stays_within_name_max() {
        let long = format!("{}.mp3", "x".repeat(NAME_MAX - 4));
        assert_eq!(long.chars().count(), NAME_MAX);
        let out = numbered(&long, 12);
        assert_eq!(out.chars().count(), NAME_MAX);
        assert!(out.ends_with(" (12).mp3"));
    }

    #[test]
    fn outcome_helpers() {
        let task = DownloadTask {
            url: "https://x/a.mp3".into(),
            destination_dir: PathBuf::from("downloads/A"),
            requested_extension: "mp3".into(),
        };
        let failed = DownloadOutcome::failure(task.clone(), &FetchError::HttpStatus { code: 404 });
        assert!(!failed.is_success());
        assert!(failed.saved_path().is_none());
        assert_eq!(
            failed.result,
            DownloadResult::Failure {
                kind: FailureKind::HttpStatus(404),
                message: "HTTP 404".into()
            }
        );

        let ok = DownloadOutcome {
            task,
            result: DownloadResult::Success {
                saved_path: PathBuf::from("downloads/A/a.mp3"),
            },
        };
        assert!(ok.is_success());
        assert_eq!(ok.saved_path(), Some(Path::new("downloads/A/a.mp3")));
    }
}
