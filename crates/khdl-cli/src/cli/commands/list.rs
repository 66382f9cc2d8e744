//! `khdl list <url>` – show an album's tracks and resolved links.

use anyhow::Result;
use khdl_core::config::KhdlConfig;
use khdl_core::{AlbumDownloader, BatchOptions, HttpClient, Khinsider};

pub async fn run_list(cfg: &KhdlConfig, url: &str, ext: Option<&str>) -> Result<()> {
    let extension = ext.unwrap_or(cfg.default_extension.as_str());
    let downloader = AlbumDownloader::new(
        HttpClient::new(cfg.http.clone()),
        Khinsider::new(cfg.base_host.clone()),
        BatchOptions::from(cfg),
    );

    let listing = downloader.fetch_listing(url).await?;
    println!("{}", listing.title);
    if listing.track_page_urls.is_empty() {
        println!("No tracks found.");
        return Ok(());
    }

    println!("{:<4} {:<8} {}", "#", extension.to_uppercase(), "LINK");
    let resolved = downloader.resolve_tracks(&listing, extension).await;
    for (i, (track_page_url, res)) in resolved.into_iter().enumerate() {
        let (status, link) = match res {
            Ok(track) => match track.resolved_download_url {
                Some(link) => ("found", link),
                None => ("-", track_page_url),
            },
            Err(e) => ("error", format!("{} ({})", track_page_url, e)),
        };
        println!("{:<4} {:<8} {}", i + 1, status, link);
    }
    Ok(())
}
