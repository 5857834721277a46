//! Cross-session state: the tuned settings overlay, one reading bookmark per
//! input file, and the first-run marker for the key help.
//!
//! Files live under `.cache/`, with per-file records keyed by a hash of the
//! input path to avoid filesystem issues. Save errors are ignored so the
//! session never stalls on persistence; loads fall back silently.

use crate::config::AppConfig;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

pub const CACHE_DIR: &str = ".cache";

/// Load the settings overlay written by earlier sessions, if any.
pub fn load_settings_overlay() -> Option<AppConfig> {
    load_settings_overlay_in(Path::new(CACHE_DIR))
}

/// Persist the current settings so the next session starts from them.
pub fn save_settings_overlay(config: &AppConfig) {
    save_settings_overlay_in(Path::new(CACHE_DIR), config);
}

/// Load the bookmarked line index for a given input file, if present.
pub fn load_bookmark(text_path: &Path) -> Option<usize> {
    load_bookmark_in(Path::new(CACHE_DIR), text_path)
}

/// Persist the current line index for a given input file.
pub fn save_bookmark(text_path: &Path, line: usize) {
    save_bookmark_in(Path::new(CACHE_DIR), text_path, line);
}

/// Whether the first-run key help was already shown.
pub fn tutorial_seen() -> bool {
    Path::new(CACHE_DIR).join("tutorial-seen").exists()
}

pub fn mark_tutorial_seen() {
    let _ = fs::create_dir_all(CACHE_DIR);
    let _ = fs::write(Path::new(CACHE_DIR).join("tutorial-seen"), "");
}

#[derive(serde::Serialize, serde::Deserialize)]
struct BookmarkEntry {
    line: usize,
}

fn load_settings_overlay_in(root: &Path) -> Option<AppConfig> {
    let data = fs::read_to_string(root.join("settings.toml")).ok()?;
    let mut config: AppConfig = toml::from_str(&data).ok()?;
    config.clamp();
    Some(config)
}

fn save_settings_overlay_in(root: &Path, config: &AppConfig) {
    let _ = fs::create_dir_all(root);
    if let Ok(contents) = crate::config::serialize_config(config) {
        let _ = fs::write(root.join("settings.toml"), contents);
    }
}

fn load_bookmark_in(root: &Path, text_path: &Path) -> Option<usize> {
    let data = fs::read_to_string(bookmark_path(root, text_path)).ok()?;
    let entry: BookmarkEntry = toml::from_str(&data).ok()?;
    Some(entry.line)
}

fn save_bookmark_in(root: &Path, text_path: &Path, line: usize) {
    let path = bookmark_path(root, text_path);
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let entry = BookmarkEntry { line };
    if let Ok(contents) = toml::to_string(&entry) {
        let _ = fs::write(path, contents);
    }
}

fn hash_dir(root: &Path, text_path: &Path) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(text_path.as_os_str().to_string_lossy().as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    root.join(hash)
}

fn bookmark_path(root: &Path, text_path: &Path) -> PathBuf {
    hash_dir(root, text_path).join("bookmark.toml")
}

#[cfg(test)]
mod tests {
    use super::{
        load_bookmark_in, load_settings_overlay_in, save_bookmark_in, save_settings_overlay_in,
    };
    use crate::config::AppConfig;
    use std::path::Path;

    #[test]
    fn bookmark_round_trips_per_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        save_bookmark_in(root, Path::new("/texts/a.txt"), 12);
        save_bookmark_in(root, Path::new("/texts/b.txt"), 3);
        assert_eq!(load_bookmark_in(root, Path::new("/texts/a.txt")), Some(12));
        assert_eq!(load_bookmark_in(root, Path::new("/texts/b.txt")), Some(3));
        assert_eq!(load_bookmark_in(root, Path::new("/texts/c.txt")), None);
    }

    #[test]
    fn settings_overlay_round_trips_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let mut config = AppConfig::default();
        config.speed_wpm = 240;
        config.theme = crate::config::ThemeMode::Night;
        save_settings_overlay_in(root, &config);
        let loaded = load_settings_overlay_in(root).unwrap();
        assert_eq!(loaded.speed_wpm, 240);
        assert_eq!(loaded.theme, crate::config::ThemeMode::Night);
    }

    #[test]
    fn missing_overlay_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_settings_overlay_in(dir.path()).is_none());
    }
}
