//! Config command implementation

use std::path::Path;

use anyhow::Result;
use finsight_core::config::default_config_path;

use super::load_config;

pub fn cmd_config(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    match (config_path, default_config_path()) {
        (Some(path), _) => println!("# Loaded from {}", path.display()),
        (None, Some(path)) if path.exists() => println!("# Loaded from {}", path.display()),
        (None, Some(path)) => println!("# Built-in defaults (override at {})", path.display()),
        (None, None) => println!("# Built-in defaults"),
    }
    println!();
    print!("{}", config.to_toml()?);

    Ok(())
}
