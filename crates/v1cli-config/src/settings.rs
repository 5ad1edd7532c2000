//! Persisted settings: `~/.v1cli/config.toml`.

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::workflow::StoryStatus;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("HOME environment variable not set; cannot locate config directory")]
    NoHome,

    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Mapping between workflow stages and V1 status OIDs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backlog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_progress: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<String>,
}

impl StatusMapping {
    pub fn oid_for(&self, status: StoryStatus) -> Option<&str> {
        let slot = match status {
            StoryStatus::Backlog => &self.backlog,
            StoryStatus::Ready => &self.ready,
            StoryStatus::InProgress => &self.in_progress,
            StoryStatus::Review => &self.review,
            StoryStatus::Done => &self.done,
        };
        slot.as_deref()
    }

    pub fn set_oid(&mut self, status: StoryStatus, oid: String) {
        let slot = match status {
            StoryStatus::Backlog => &mut self.backlog,
            StoryStatus::Ready => &mut self.ready,
            StoryStatus::InProgress => &mut self.in_progress,
            StoryStatus::Review => &mut self.review,
            StoryStatus::Done => &mut self.done,
        };
        *slot = Some(oid);
    }

    pub fn status_for(&self, oid: &str) -> Option<StoryStatus> {
        StoryStatus::ALL
            .into_iter()
            .find(|status| self.oid_for(*status) == Some(oid))
    }

    pub fn is_configured(&self) -> bool {
        StoryStatus::ALL
            .into_iter()
            .any(|status| self.oid_for(status).is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnFormat {
    Date,
    Percent,
    Points,
    Hours,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justify {
    #[default]
    Left,
    Right,
    Center,
}

/// One display column: which API field it reads and how it renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// API attribute name, possibly dotted (e.g. `Status.Name`).
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ColumnFormat>,
    #[serde(default)]
    pub justify: Justify,
}

impl ColumnConfig {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            label: None,
            style: None,
            max_width: None,
            format: None,
            justify: Justify::Left,
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn style(mut self, style: &str) -> Self {
        self.style = Some(style.to_string());
        self
    }

    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn format(mut self, format: ColumnFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }
}

/// Query and display configuration for one asset type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetQueryConfig {
    #[serde(default)]
    pub select: Vec<String>,
    #[serde(default)]
    pub filters: Vec<String>,
    #[serde(default)]
    pub sort: Vec<String>,
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

impl AssetQueryConfig {
    pub fn is_configured(&self) -> bool {
        !self.select.is_empty()
    }
}

/// Query configurations for every asset type in a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectQueryConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    /// ISO-8601 timestamp of the last schema auto-detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_detected: Option<String>,
    #[serde(default)]
    pub delivery_groups: AssetQueryConfig,
    #[serde(default)]
    pub features: AssetQueryConfig,
    #[serde(default)]
    pub stories: AssetQueryConfig,
    #[serde(default)]
    pub tasks: AssetQueryConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for ProjectQueryConfig {
    fn default() -> Self {
        Self {
            version: 1,
            last_detected: None,
            delivery_groups: AssetQueryConfig::default(),
            features: AssetQueryConfig::default(),
            stories: AssetQueryConfig::default(),
            tasks: AssetQueryConfig::default(),
        }
    }
}

impl ProjectQueryConfig {
    pub fn is_configured(&self) -> bool {
        self.delivery_groups.is_configured()
            || self.features.is_configured()
            || self.stories.is_configured()
            || self.tasks.is_configured()
    }
}

/// A bookmarked project, with an optional custom query configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectBookmark {
    pub name: String,
    pub oid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_config: Option<ProjectQueryConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_oid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,
    #[serde(default)]
    pub status_mapping: StatusMapping,
    #[serde(default)]
    pub bookmarks: Vec<ProjectBookmark>,
}

impl Settings {
    /// Finds a bookmark by index, V1 number, OID token or name.
    ///
    /// Resolution order:
    /// 1. `1..=99` is a 1-based index into the bookmark list.
    /// 2. Larger bare numbers and `E-nnn` numbers match the digits of the
    ///    bookmark OID (leading zeros stripped).
    /// 3. `Type:digits` matches the OID case-insensitively.
    /// 4. Anything else matches the name case-insensitively.
    pub fn get_bookmark(&self, identifier: &str) -> Option<&ProjectBookmark> {
        let identifier_lower = identifier.to_lowercase();

        if identifier.chars().all(|c| c.is_ascii_digit()) && !identifier.is_empty() {
            let index: usize = identifier.parse().ok()?;
            if (1..=99).contains(&index) && index <= self.bookmarks.len() {
                return self.bookmarks.get(index - 1);
            }
            let digits = identifier.trim_start_matches('0');
            let digits = if digits.is_empty() { "0" } else { digits };
            return self.find_by_oid_digits(digits);
        }

        if is_oid_token(identifier) {
            return self
                .bookmarks
                .iter()
                .find(|b| b.oid.to_lowercase() == identifier_lower);
        }

        if let Some(rest) = identifier_lower.strip_prefix("e-") {
            let digits = rest.trim_start_matches('0');
            let digits = if digits.is_empty() { "0" } else { digits };
            return self.find_by_oid_digits(digits);
        }

        self.bookmarks
            .iter()
            .find(|b| b.name.to_lowercase() == identifier_lower)
    }

    pub fn get_bookmark_mut(&mut self, identifier: &str) -> Option<&mut ProjectBookmark> {
        let oid = self.get_bookmark(identifier)?.oid.clone();
        self.bookmarks.iter_mut().find(|b| b.oid == oid)
    }

    fn find_by_oid_digits(&self, digits: &str) -> Option<&ProjectBookmark> {
        self.bookmarks
            .iter()
            .find(|b| oid_digits(&b.oid) == Some(digits))
    }

    /// Adds a bookmark, or updates the OID of an existing same-name one.
    pub fn add_bookmark(&mut self, name: &str, oid: &str) {
        if let Some(existing) = self
            .bookmarks
            .iter_mut()
            .find(|b| b.name.eq_ignore_ascii_case(name))
        {
            existing.oid = oid.to_string();
            return;
        }
        self.bookmarks.push(ProjectBookmark {
            name: name.to_string(),
            oid: oid.to_string(),
            query_config: None,
        });
    }

    /// Removes a bookmark; clears the default project if it pointed there.
    pub fn remove_bookmark(&mut self, identifier: &str) -> Option<ProjectBookmark> {
        let oid = self.get_bookmark(identifier)?.oid.clone();
        let index = self.bookmarks.iter().position(|b| b.oid == oid)?;
        let removed = self.bookmarks.remove(index);
        if self.default_project.as_deref() == Some(removed.oid.as_str()) {
            self.default_project = None;
        }
        Some(removed)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// `Type:digits` with an alphabetic type part.
pub(crate) fn is_oid_token(identifier: &str) -> bool {
    match identifier.split_once(':') {
        Some((kind, digits)) => {
            !kind.is_empty()
                && kind.chars().all(|c| c.is_ascii_alphabetic())
                && !digits.is_empty()
                && digits.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

fn oid_digits(oid: &str) -> Option<&str> {
    oid.split_once(':').map(|(_, digits)| digits)
}

/// Config directory: `$V1CLI_CONFIG_DIR`, else `$HOME/.v1cli`.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("V1CLI_CONFIG_DIR") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(home).join(".v1cli"))
}

pub fn settings_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_settings() -> Settings {
        let mut settings = Settings::default();
        settings.add_bookmark("Checkout Revamp", "Epic:1234");
        settings.add_bookmark("Mobile App", "Epic:567");
        settings
    }

    #[test]
    fn test_bookmark_by_index() {
        let settings = sample_settings();
        assert_eq!(settings.get_bookmark("1").unwrap().name, "Checkout Revamp");
        assert_eq!(settings.get_bookmark("2").unwrap().name, "Mobile App");
        assert!(settings.get_bookmark("3").is_none());
    }

    #[test]
    fn test_bookmark_by_v1_number() {
        let settings = sample_settings();
        assert_eq!(settings.get_bookmark("E-1234").unwrap().oid, "Epic:1234");
        assert_eq!(settings.get_bookmark("e-0567").unwrap().oid, "Epic:567");
        assert!(settings.get_bookmark("E-999").is_none());
    }

    #[test]
    fn test_bookmark_by_large_bare_number() {
        let settings = sample_settings();
        // > 99 falls through to OID digit matching
        assert_eq!(settings.get_bookmark("1234").unwrap().oid, "Epic:1234");
    }

    #[test]
    fn test_bookmark_by_oid_token() {
        let settings = sample_settings();
        assert_eq!(
            settings.get_bookmark("epic:1234").unwrap().name,
            "Checkout Revamp"
        );
    }

    #[test]
    fn test_bookmark_by_name_case_insensitive() {
        let settings = sample_settings();
        assert_eq!(
            settings.get_bookmark("mobile app").unwrap().oid,
            "Epic:567"
        );
    }

    #[test]
    fn test_add_bookmark_updates_existing() {
        let mut settings = sample_settings();
        settings.add_bookmark("Mobile App", "Epic:9999");
        assert_eq!(settings.bookmarks.len(), 2);
        assert_eq!(settings.get_bookmark("Mobile App").unwrap().oid, "Epic:9999");
    }

    #[test]
    fn test_remove_bookmark_clears_default() {
        let mut settings = sample_settings();
        settings.default_project = Some("Epic:1234".to_string());
        let removed = settings.remove_bookmark("E-1234").unwrap();
        assert_eq!(removed.name, "Checkout Revamp");
        assert!(settings.default_project.is_none());
        assert_eq!(settings.bookmarks.len(), 1);
    }

    #[test]
    fn test_remove_bookmark_keeps_unrelated_default() {
        let mut settings = sample_settings();
        settings.default_project = Some("Epic:567".to_string());
        settings.remove_bookmark("1").unwrap();
        assert_eq!(settings.default_project.as_deref(), Some("Epic:567"));
    }

    #[test]
    fn test_is_oid_token() {
        assert!(is_oid_token("Epic:1234"));
        assert!(is_oid_token("Story:5678"));
        assert!(!is_oid_token("E-1234"));
        assert!(!is_oid_token("1234"));
        assert!(!is_oid_token("Epic:"));
        assert!(!is_oid_token(":1234"));
        assert!(!is_oid_token("Epic:12x4"));
    }

    #[test]
    fn test_status_mapping_round_trip() {
        let mut mapping = StatusMapping::default();
        assert!(!mapping.is_configured());
        mapping.set_oid(StoryStatus::InProgress, "StoryStatus:134".to_string());
        assert!(mapping.is_configured());
        assert_eq!(
            mapping.oid_for(StoryStatus::InProgress),
            Some("StoryStatus:134")
        );
        assert_eq!(
            mapping.status_for("StoryStatus:134"),
            Some(StoryStatus::InProgress)
        );
        assert_eq!(mapping.status_for("StoryStatus:999"), None);
    }

    #[test]
    fn test_settings_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = sample_settings();
        settings.member_oid = Some("Member:20".to_string());
        settings.member_name = Some("Ada".to_string());
        settings.default_project = Some("Epic:1234".to_string());
        settings
            .status_mapping
            .set_oid(StoryStatus::Done, "StoryStatus:137".to_string());
        settings.bookmarks[0].query_config = Some(ProjectQueryConfig {
            last_detected: Some("2026-08-01T12:00:00Z".to_string()),
            stories: AssetQueryConfig {
                select: vec!["Name".to_string(), "Number".to_string()],
                filters: vec![],
                sort: vec!["-ChangeDateUTC".to_string()],
                columns: vec![ColumnConfig::new("Number").label("Number").style("cyan")],
            },
            ..ProjectQueryConfig::default()
        });

        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();

        assert_eq!(loaded.member_oid.as_deref(), Some("Member:20"));
        assert_eq!(loaded.bookmarks.len(), 2);
        let config = loaded.bookmarks[0].query_config.as_ref().unwrap();
        assert_eq!(config.version, 1);
        assert!(config.stories.is_configured());
        assert!(!config.tasks.is_configured());
        assert_eq!(config.stories.columns[0].style.as_deref(), Some("cyan"));
        assert_eq!(
            loaded.status_mapping.oid_for(StoryStatus::Done),
            Some("StoryStatus:137")
        );
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("config.toml")).unwrap();
        assert!(settings.bookmarks.is_empty());
        assert!(settings.member_oid.is_none());
    }
}
