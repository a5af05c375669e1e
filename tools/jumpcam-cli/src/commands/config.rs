//! Show or save the effective configuration.

use jumpcam_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, write: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        let path = config.save()?;
        println!();
        println!("Config written to: {}", path.display());
    } else {
        println!();
        println!("Standard location: {}", config_file_path().display());
    }

    Ok(())
}
