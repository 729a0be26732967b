//! Game install path detection

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Steam folder name of the game.
pub const GAME_FOLDER: &str = "KingdomComeDeliverance2";

/// Default Steam root on Windows
pub const STEAM_ROOT_WINDOWS: &str = r"C:\Program Files (x86)\Steam";

/// Default Steam root on macOS
pub const STEAM_ROOT_MACOS: &str = "~/Library/Application Support/Steam";

/// Default Steam root on Linux
pub const STEAM_ROOT_LINUX: &str = "~/.steam/steam";

/// Expand a leading `~` in a configured path.
#[must_use]
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Steam root for the current platform (resolves ~)
#[must_use]
pub fn steam_root() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        Some(PathBuf::from(STEAM_ROOT_WINDOWS))
    }

    #[cfg(target_os = "macos")]
    {
        Some(expand_path(STEAM_ROOT_MACOS))
    }

    #[cfg(target_os = "linux")]
    {
        Some(expand_path(STEAM_ROOT_LINUX))
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        None
    }
}

/// Library folders listed in a Steam `libraryfolders.vdf`.
fn parse_library_folders(vdf: &str) -> Vec<PathBuf> {
    vdf.lines()
        .filter(|line| line.trim_start().starts_with("\"path\""))
        .filter_map(|line| line.split('"').nth(3))
        .map(|path| PathBuf::from(path.replace("\\\\", "\\")))
        .collect()
}

/// Find the game folder in the Steam root or any of its extra libraries.
#[must_use]
pub fn find_in_steam(steam_root: &Path) -> Option<PathBuf> {
    let mut libraries = vec![steam_root.to_path_buf()];
    match fs::read_to_string(steam_root.join("steamapps").join("libraryfolders.vdf")) {
        Ok(vdf) => libraries.extend(parse_library_folders(&vdf)),
        Err(e) => tracing::debug!("No Steam library list under {}: {}", steam_root.display(), e),
    }

    libraries
        .into_iter()
        .map(|library| library.join("steamapps").join("common").join(GAME_FOLDER))
        .find(|path| path.is_dir())
}

/// Use `configured` when given, otherwise search the platform's Steam libraries.
///
/// # Errors
/// Returns [`Error::InvalidPath`] if the configured path does not exist and
/// [`Error::GamePathNotFound`] if detection finds nothing.
pub fn resolve_game_path(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        if !path.is_dir() {
            return Err(Error::InvalidPath(format!(
                "Game path does not exist: {}",
                path.display()
            )));
        }
        return Ok(path.to_path_buf());
    }

    let found = steam_root().and_then(|root| find_in_steam(&root));
    match found {
        Some(path) => {
            tracing::info!("Detected game at {}", path.display());
            Ok(path)
        }
        None => Err(Error::GamePathNotFound),
    }
}
