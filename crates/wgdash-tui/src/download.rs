//! Writing fetched tunnel configs to disk.

use std::path::{Path, PathBuf};

use directories::UserDirs;
use wgdash_core::ClientId;

/// Directory where downloaded configs land.
///
/// An explicitly configured directory wins; otherwise the platform
/// download directory, falling back to the working directory.
pub fn resolve_download_dir(configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// File name for a peer's tunnel config.
///
/// The peer name is reduced to `[A-Za-z0-9_-]`; anything else becomes
/// a dash. A name with nothing usable left falls back to
/// `client-<id>`.
pub fn config_file_name(name: &str, id: ClientId) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let stem = stem.trim_matches('-');
    if stem.is_empty() {
        format!("client-{id}.conf")
    } else {
        format!("{stem}.conf")
    }
}

/// Write `contents` to `<dir>/<file_name>`, creating the directory if
/// needed. An existing file is overwritten.
pub fn write_config(dir: &Path, file_name: &str, contents: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, contents)?;
    Ok(path)
}
