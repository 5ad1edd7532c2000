//! Local storage: settings plus row-number caches.
//!
//! Listings cache `(number, oid)` pairs so follow-up commands can say
//! "story 3" instead of repeating the display number.

use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use v1cli_config::ConfigError;
use v1cli_config::Settings;

const FEATURES_CACHE: &str = "features_cache.json";
const STORIES_CACHE: &str = "stories_cache.json";

pub struct LocalStorage {
    config_dir: PathBuf,
}

impl LocalStorage {
    pub fn open() -> Result<Self, ConfigError> {
        let config_dir = v1cli_config::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    fn settings_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn settings(&self) -> Result<Settings, ConfigError> {
        Settings::load(&self.settings_path())
    }

    pub fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        settings.save(&self.settings_path())
    }

    pub fn cache_member(&self, oid: &str, name: &str) -> Result<(), ConfigError> {
        let mut settings = self.settings()?;
        settings.member_oid = Some(oid.to_string());
        settings.member_name = Some(name.to_string());
        self.save(&settings)
    }

    pub fn cached_member_oid(&self) -> Option<String> {
        self.settings().ok()?.member_oid
    }

    pub fn add_project_bookmark(&self, name: &str, oid: &str) -> Result<(), ConfigError> {
        let mut settings = self.settings()?;
        settings.add_bookmark(name, oid);
        self.save(&settings)
    }

    /// Removes a bookmark; returns `(name, oid)` when one matched.
    pub fn remove_project_bookmark(
        &self,
        identifier: &str,
    ) -> Result<Option<(String, String)>, ConfigError> {
        let mut settings = self.settings()?;
        let removed = settings.remove_bookmark(identifier);
        if removed.is_some() {
            self.save(&settings)?;
        }
        Ok(removed.map(|b| (b.name, b.oid)))
    }

    pub fn set_default_project(&self, oid: &str) -> Result<(), ConfigError> {
        let mut settings = self.settings()?;
        settings.default_project = Some(oid.to_string());
        self.save(&settings)
    }

    pub fn default_project_oid(&self) -> Option<String> {
        self.settings().ok()?.default_project
    }

    pub fn bookmarked_project_oids(&self) -> Vec<String> {
        self.settings()
            .map(|s| s.bookmarks.iter().map(|b| b.oid.clone()).collect())
            .unwrap_or_default()
    }

    // Row-number caches

    pub fn cache_features(&self, rows: &[(String, String)]) {
        self.write_cache(FEATURES_CACHE, rows);
    }

    pub fn cached_feature(&self, index: usize) -> Option<(String, String)> {
        self.read_cache(FEATURES_CACHE, index)
    }

    pub fn cache_stories(&self, rows: &[(String, String)]) {
        self.write_cache(STORIES_CACHE, rows);
    }

    pub fn cached_story(&self, index: usize) -> Option<(String, String)> {
        self.read_cache(STORIES_CACHE, index)
    }

    fn write_cache(&self, file: &str, rows: &[(String, String)]) {
        let path = self.config_dir.join(file);
        match serde_json::to_string(rows) {
            Ok(text) => {
                if let Err(err) = std::fs::write(&path, text) {
                    debug!(%err, cache = file, "cache write failed");
                }
            }
            Err(err) => debug!(%err, cache = file, "cache serialize failed"),
        }
    }

    /// 1-based lookup; a missing or corrupt cache file yields `None`.
    fn read_cache(&self, file: &str, index: usize) -> Option<(String, String)> {
        let path = self.config_dir.join(file);
        let text = std::fs::read_to_string(path).ok()?;
        let rows: Vec<(String, String)> = serde_json::from_str(&text).ok()?;
        if index >= 1 && index <= rows.len() {
            rows.into_iter().nth(index - 1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_in(dir: &Path) -> LocalStorage {
        LocalStorage {
            config_dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path());

        storage.cache_member("Member:20", "Ada").unwrap();
        assert_eq!(storage.cached_member_oid().as_deref(), Some("Member:20"));

        storage.add_project_bookmark("Checkout", "Epic:1").unwrap();
        storage.set_default_project("Epic:1").unwrap();
        assert_eq!(storage.default_project_oid().as_deref(), Some("Epic:1"));
        assert_eq!(storage.bookmarked_project_oids(), vec!["Epic:1"]);

        let removed = storage.remove_project_bookmark("E-1").unwrap().unwrap();
        assert_eq!(removed, ("Checkout".to_string(), "Epic:1".to_string()));
        assert!(storage.default_project_oid().is_none());
    }

    #[test]
    fn test_feature_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path());

        storage.cache_features(&[
            ("E-100".to_string(), "Epic:100".to_string()),
            ("E-101".to_string(), "Epic:101".to_string()),
        ]);

        assert_eq!(
            storage.cached_feature(1),
            Some(("E-100".to_string(), "Epic:100".to_string()))
        );
        assert_eq!(
            storage.cached_feature(2),
            Some(("E-101".to_string(), "Epic:101".to_string()))
        );
        assert!(storage.cached_feature(0).is_none());
        assert!(storage.cached_feature(3).is_none());
    }

    #[test]
    fn test_cache_tolerates_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path());
        std::fs::write(dir.path().join(STORIES_CACHE), "not json").unwrap();
        assert!(storage.cached_story(1).is_none());
    }

    #[test]
    fn test_cache_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path());
        assert!(storage.cached_story(1).is_none());
    }
}
