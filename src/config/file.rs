//
//  ebay-sdk
//  config/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration File I/O Module
//!
//! Low-level file operations used by [`Config`](super::Config). Writes
//! create missing parent directories; reads return the raw TOML text.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use ebay_sdk::config::{config_exists, read_config_file, write_config_file};
//!
//! let path = Path::new("/tmp/ebay-sdk/config.toml");
//!
//! if !config_exists(path) {
//!     write_config_file(path, "[defaults]\nconcurrency = 4\n")?;
//! }
//! let content = read_config_file(path)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::path::Path;

use anyhow::{Context, Result};

/// Reads the whole configuration file.
///
/// # Errors
///
/// Returns an error naming the path if the file cannot be read.
pub fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))
}

/// Writes `content` to `path`, creating parent directories first.
///
/// On Unix the file is restricted to the owner, since profiles may hold
/// credentials.
pub fn write_config_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

/// Returns `true` if a file exists at `path`.
pub fn config_exists(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(!config_exists(&path));
        write_config_file(&path, "[defaults]\n").unwrap();
        assert!(config_exists(&path));
        assert_eq!(read_config_file(&path).unwrap(), "[defaults]\n");
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = read_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
