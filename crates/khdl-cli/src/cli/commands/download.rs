//! `khdl download` – run album batches one after another.

use anyhow::{Context, Result};
use khdl_core::config::KhdlConfig;
use khdl_core::pipeline::album_urls_from_text;
use khdl_core::{
    AlbumDownloader, BatchOptions, BatchReport, DownloadResult, HttpClient, Khinsider,
};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct DownloadArgs {
    pub urls: Vec<String>,
    pub ext: Option<String>,
    pub input: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub output: Option<PathBuf>,
}

pub async fn run_download(cfg: &KhdlConfig, args: DownloadArgs) -> Result<()> {
    let input_text = match &args.input {
        Some(path) => Some(read_input(path)?),
        None => None,
    };
    let urls = collect_urls(&args.urls, input_text.as_deref());
    if urls.is_empty() {
        anyhow::bail!("no album URLs given (pass URLs or --input FILE)");
    }
    let extension = args
        .ext
        .clone()
        .unwrap_or_else(|| cfg.default_extension.clone());
    let options = batch_options(cfg, args.jobs, args.output.clone());

    let downloader = AlbumDownloader::new(
        HttpClient::new(cfg.http.clone()),
        Khinsider::new(cfg.base_host.clone()),
        options,
    );

    let mut fatal = 0usize;
    let mut failed = 0usize;
    for run in downloader.run_album_batches(&urls, &extension).await {
        match run.result {
            Ok(report) => {
                print_report(&report);
                failed += report.failed();
            }
            Err(e) => {
                println!("{}\n  error: {}", run.album_url, e);
                fatal += 1;
            }
        }
    }

    if fatal > 0 || failed > 0 {
        anyhow::bail!("{} album(s) failed, {} download(s) failed", fatal, failed);
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read album URLs from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("read album URLs: {}", path.display()))
}

/// Positional URLs first, then the lines of the input file.
pub(crate) fn collect_urls(args: &[String], input_text: Option<&str>) -> Vec<String> {
    let mut urls = album_urls_from_text(&args.join("\n"));
    if let Some(text) = input_text {
        urls.extend(album_urls_from_text(text));
    }
    urls
}

/// Config values overridden by `--jobs` / `--output`. `--jobs 0` means unbounded.
pub(crate) fn batch_options(
    cfg: &KhdlConfig,
    jobs: Option<usize>,
    output: Option<PathBuf>,
) -> BatchOptions {
    let mut options = BatchOptions::from(cfg);
    if let Some(n) = jobs {
        options.max_concurrent = (n > 0).then_some(n);
    }
    if let Some(dir) = output {
        options.download_root = dir;
    }
    options
}

fn print_report(report: &BatchReport) {
    println!(
        "{} -> {}",
        report.listing.title,
        report.destination_dir.display()
    );
    for outcome in &report.outcomes {
        match &outcome.result {
            DownloadResult::Success { saved_path } => println!("  ok    {}", saved_path.display()),
            DownloadResult::Failure { kind, message } => {
                println!("  FAIL  {} ({}: {})", outcome.task.url, kind, message)
            }
        }
    }
    println!(
        "  {} downloaded, {} failed, {} without a matching link",
        report.succeeded(),
        report.failed(),
        report.skipped
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_urls_merges_args_and_input() {
        let args = vec!["https://a/album/x".to_string(), "  ".to_string()];
        let urls = collect_urls(&args, Some("# list\nhttps://a/album/y\n\nhttps://a/album/z\n"));
        assert_eq!(
            urls,
            vec!["https://a/album/x", "https://a/album/y", "https://a/album/z"]
        );
        assert!(collect_urls(&[], None).is_empty());
    }

    #[test]
    fn batch_options_overrides() {
        let mut cfg = KhdlConfig::default();
        cfg.max_concurrent_downloads = Some(4);
        let opts = batch_options(&cfg, None, None);
        assert_eq!(opts.max_concurrent, Some(4));
        assert_eq!(opts.download_root, PathBuf::from("downloads"));

        let opts = batch_options(&cfg, Some(0), Some(PathBuf::from("/music")));
        assert_eq!(opts.max_concurrent, None);
        assert_eq!(opts.download_root, PathBuf::from("/music"));

        let opts = batch_options(&cfg, Some(2), None);
        assert_eq!(opts.max_concurrent, Some(2));
    }
}
