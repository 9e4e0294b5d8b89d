//! Messenger configuration
//!
//! Loaded from TOML; every section and key is optional and falls back to
//! the defaults below.
//!
//! ```toml
//! [files]
//! avatar_uploads = false
//!
//! [collections.calls]
//! index_count = 10
//! page_count = 10
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::errors::{ParleyError, Result};
use crate::logging_facility::Profile;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct MessengerConfig {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub files: FilesConfig,
    pub defaults: DefaultsConfig,
    pub collections: CollectionsConfig,
    pub purge: PurgeConfig,
    pub api: ApiConfig,
}

impl MessengerConfig {
    /// # Errors
    ///
    /// Returns `Serialization` if the document is not valid TOML, a key
    /// has the wrong type, or a value is out of range.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| ParleyError::Serialization {
            message: format!("invalid messenger config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot work.
    ///
    /// # Errors
    ///
    /// `Serialization` naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        self.collections.validate()
    }

    /// # Errors
    ///
    /// Returns `Internal` if the file cannot be read, `Serialization` if it
    /// cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ParleyError::Internal {
            message: format!("cannot read config {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&source)
    }

    /// Whether `image` is one of the shared default avatars
    pub fn is_protected_default(&self, image: &str) -> bool {
        self.defaults.group_avatars.iter().any(|d| d == image)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub profile: Profile,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Disk that thread files (avatars, documents) are stored on
    pub threads_disk: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            threads_disk: "messenger".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub avatar_uploads: bool,
    pub avatar_max_kb: u64,
    pub avatar_extensions: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            avatar_uploads: true,
            avatar_max_kb: 5120,
            avatar_extensions: ["jpg", "jpeg", "png", "bmp", "gif", "webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Shared avatars that are never deleted from storage
    pub group_avatars: Vec<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            group_avatars: (1..=5).map(|n| format!("{}.png", n)).collect(),
        }
    }
}

/// Page sizes for one collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageSizes {
    /// Items on the first (index) page
    pub index_count: usize,
    /// Items on every cursor page after the first
    pub page_count: usize,
}

impl PageSizes {
    pub const fn new(index_count: usize, page_count: usize) -> Self {
        Self {
            index_count,
            page_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CollectionsConfig {
    pub threads: PageSizes,
    pub privates: PageSizes,
    pub groups: PageSizes,
    pub calls: PageSizes,
}

impl CollectionsConfig {
    fn validate(&self) -> Result<()> {
        let sections = [
            ("threads", self.threads),
            ("privates", self.privates),
            ("groups", self.groups),
            ("calls", self.calls),
        ];
        for (name, sizes) in sections {
            if sizes.index_count == 0 || sizes.page_count == 0 {
                return Err(ParleyError::Serialization {
                    message: format!(
                        "invalid messenger config: collections.{} page sizes must be at least 1",
                        name
                    ),
                });
            }
        }
        Ok(())
    }
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            threads: PageSizes::new(100, 25),
            privates: PageSizes::new(100, 25),
            groups: PageSizes::new(100, 25),
            calls: PageSizes::new(25, 25),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PurgeConfig {
    /// Soft-deleted text messages older than this many days are purged
    pub message_days: u32,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self { message_days: 30 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub route_prefix: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            route_prefix: "/api/messenger".to_string(),
        }
    }
}
