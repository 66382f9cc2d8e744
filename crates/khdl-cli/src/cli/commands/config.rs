//! `khdl config` – show where the config lives and what is in effect.

use anyhow::Result;
use khdl_core::config::{config_path, KhdlConfig};
use khdl_core::logging::log_path;
use std::path::Path;

pub fn run_config(cfg: &KhdlConfig, explicit: Option<&Path>) -> Result<()> {
    match explicit {
        Some(p) => println!("config: {}", p.display()),
        None => println!("config: {}", config_path()?.display()),
    }
    if let Ok(p) = log_path() {
        println!("log:    {}", p.display());
    }
    println!();
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
