//! CLI command for version resolution

use crate::config::ExtractConfig;
use crate::paths::resolve_game_path;
use crate::version::{VersionStatus, resolve_version, sync_version_file};

pub fn execute(config: &ExtractConfig, sync: bool) -> anyhow::Result<()> {
    let data_dir = config.data_dir();

    if sync {
        let game_path = resolve_game_path(config.game_path().as_deref())?;
        if sync_version_file(&game_path, &data_dir)? {
            println!("Updated version descriptor from {}", game_path.display());
        }
    }

    let resolved = resolve_version(&data_dir)?;
    match resolved.status {
        VersionStatus::New => println!("{} (new, created {})", resolved.version, resolved.dir.display()),
        VersionStatus::Unchanged => println!("{}", resolved.version),
    }
    Ok(())
}
