//! CLI for khdl.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use khdl_core::config::{self, KhdlConfig};
use std::path::PathBuf;

use commands::{run_config, run_download, run_list, DownloadArgs};

/// Top-level CLI for the khinsider album downloader.
#[derive(Debug, Parser)]
#[command(name = "khdl")]
#[command(about = "khdl: download khinsider albums, one file per track", long_about = None)]
pub struct Cli {
    /// Read config from this file instead of ~/.config/khdl/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every track of one or more albums.
    Download {
        /// Album page URLs.
        urls: Vec<String>,

        /// File extension to download (e.g. mp3, flac). Defaults to the config value.
        #[arg(short, long)]
        ext: Option<String>,

        /// Read album URLs from a file, one per line ("-" for stdin).
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Maximum tracks in flight per album (0 = one per track).
        #[arg(short, long, value_name = "N")]
        jobs: Option<usize>,

        /// Root directory for album folders.
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Show an album's title, tracks and resolved links without downloading.
    List {
        /// Album page URL.
        url: String,

        /// File extension to resolve links for.
        #[arg(short, long)]
        ext: Option<String>,
    },

    /// Print the config path and effective settings.
    Config,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_ref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Download {
                urls,
                ext,
                input,
                jobs,
                output,
            } => {
                let args = DownloadArgs {
                    urls,
                    ext,
                    input,
                    jobs,
                    output,
                };
                run_download(&cfg, args).await?
            }
            CliCommand::List { url, ext } => run_list(&cfg, &url, ext.as_deref()).await?,
            CliCommand::Config => run_config(&cfg, cli.config.as_deref())?,
        }

        Ok(())
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<KhdlConfig> {
    match path {
        Some(p) => config::load_from_path(p),
        None => config::load_or_init(),
    }
}

#[cfg(test)]
mod tests;
