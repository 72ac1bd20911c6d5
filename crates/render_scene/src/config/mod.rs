//! Configuration system
//!
//! [`SceneConfig`] sizes the scene's entity pools and picks their overflow
//! behavior. Any [`Config`] type can be loaded from or saved to `.toml` and
//! `.ron` files.

use std::path::{Path, PathBuf};

pub use serde::{Deserialize, Serialize};

pub use crate::foundation::collections::OverflowPolicy;
use crate::scene::Layers;

/// On-disk format of a config file, picked from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Format for `path`, matched case-insensitively on the extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    fn parse<T: for<'de> Deserialize<'de>>(self, text: &str) -> Result<T, String> {
        match self {
            Self::Toml => toml::from_str(text).map_err(|e| e.to_string()),
            Self::Ron => ron::from_str(text).map_err(|e| e.to_string()),
        }
    }

    fn render<T: Serialize>(self, value: &T) -> Result<String, String> {
        match self {
            Self::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
                .map_err(|e| e.to_string()),
        }
    }
}

/// Settings that can be read from and written to `.toml` / `.ron` files
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Read settings from `path`
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        format.parse(&text).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Write settings to `path`, replacing any existing file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = ConfigFormat::from_path(path)?
            .render(self)
            .map_err(ConfigError::Serialize)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Errors loading, saving or validating settings
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("Cannot access {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// File contents did not match the settings type
    #[error("Malformed config {}: {message}", path.display())]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Settings could not be rendered to text
    #[error("Cannot serialize config: {0}")]
    Serialize(String),

    /// Extension is neither `.toml` nor `.ron`
    #[error("Unsupported config format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Values parsed but are not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Scene pool sizing and query defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Initial capacity of each pooled category (models, cameras, lights)
    pub pool_capacity: usize,

    /// What happens when a pool is full
    pub overflow: OverflowPolicy,

    /// Mask used by `Scene::raycast_default`
    pub default_raycast_mask: Layers,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            pool_capacity: 16,
            overflow: OverflowPolicy::Grow,
            default_raycast_mask: Layers::RAYCASTABLE,
        }
    }
}

impl SceneConfig {
    /// Set the pool capacity
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    /// Set the overflow policy
    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Reject settings the scene cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_capacity == 0 {
            return Err(ConfigError::Invalid(
                "pool_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config for SceneConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_size_is_sixteen() {
        let config = SceneConfig::default();
        assert_eq!(config.pool_capacity, 16);
        assert_eq!(config.overflow, OverflowPolicy::Grow);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_is_invalid() {
        let config = SceneConfig::default().with_pool_capacity(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SceneConfig = toml::from_str("overflow = \"fail\"").unwrap();
        assert_eq!(config.overflow, OverflowPolicy::Fail);
        assert_eq!(config.pool_capacity, 16);
        assert_eq!(config.default_raycast_mask, Layers::RAYCASTABLE);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = SceneConfig::default()
            .with_pool_capacity(64)
            .with_overflow(OverflowPolicy::Fail);
        let text = ron::ser::to_string(&config).unwrap();
        let parsed: SceneConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("scene.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("dir/Scene.RON")).unwrap(), ConfigFormat::Ron);
        assert!(matches!(
            ConfigFormat::from_path(Path::new("scene")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = SceneConfig::default().save_to_file("scene.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(p)) if p == Path::new("scene.yaml")));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let path = std::env::temp_dir().join("render_scene_missing_config.toml");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            SceneConfig::load_from_file(&path),
            Err(ConfigError::Io { path: p, .. }) if p == path
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("render_scene_config_{}.toml", std::process::id()));
        let config = SceneConfig::default()
            .with_pool_capacity(32)
            .with_overflow(OverflowPolicy::Fail);

        config.save_to_file(&path).unwrap();
        let loaded = SceneConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }
}
