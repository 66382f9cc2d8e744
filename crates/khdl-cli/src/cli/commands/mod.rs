//! CLI command handlers. Each command is in its own file.

mod config;
mod download;
mod list;

pub use config::run_config;
pub use download::{run_download, DownloadArgs};
pub use list::run_list;
