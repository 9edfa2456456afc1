//! Application directory paths for the search service.
//!
//! Uses the [`dirs`] crate for platform-appropriate resolution.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Data | `~/Library/Application Support/corpsite/` | `~/.local/share/corpsite/` |
//! | Config | `~/Library/Application Support/corpsite/` | `~/.config/corpsite/` |
//!
//! # Environment Overrides
//!
//! - `CORPSITE_DATA_DIR` overrides [`data_dir`]
//! - `CORPSITE_CONFIG_DIR` overrides [`config_dir`]

use std::path::PathBuf;

/// Application data root: content collections and the audit log.
///
/// Resolves to `dirs::data_dir()/corpsite/` by default.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("CORPSITE_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("corpsite"))
        .unwrap_or_else(|| PathBuf::from("/tmp/corpsite-data"))
}

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/corpsite/` by default.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("CORPSITE_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("corpsite"))
        .unwrap_or_else(|| PathBuf::from("/tmp/corpsite-config"))
}

/// `config_dir()/config.toml`.
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// `data_dir()/content/`, one JSON file per content domain.
#[must_use]
pub fn content_dir() -> PathBuf {
    data_dir().join("content")
}

/// `data_dir()/search_audit.jsonl`.
#[must_use]
pub fn audit_file() -> PathBuf {
    data_dir().join("search_audit.jsonl")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_is_nonempty() {
        assert!(!data_dir().as_os_str().is_empty());
    }

    #[test]
    fn config_file_is_toml_in_config_dir() {
        let file = config_file();
        assert!(file.ends_with("config.toml"));
        assert_eq!(file.parent(), Some(config_dir().as_path()));
    }

    #[test]
    fn content_and_audit_live_under_data_dir() {
        let root = data_dir();
        assert!(content_dir().starts_with(&root));
        assert!(audit_file().starts_with(&root));
        assert_eq!(
            audit_file().extension().and_then(|e| e.to_str()),
            Some("jsonl")
        );
    }
}
