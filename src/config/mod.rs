/*!
# Loader Configuration

TOML configuration of the definition loader (`formdef.toml`). Every field
has a default, so an empty file (or no file) yields a working loader that
reads the store from the current directory.

```toml
[definitions]
root = "definitions"
forms = "forms"

[validation]
action_processors = true

[cache]
enabled = false
```
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "formdef.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    pub definitions: DefinitionsConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Directory layout of the definition store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefinitionsConfig {
    /// Store root; the other directories are relative to it
    pub root: PathBuf,
    pub forms: PathBuf,
    pub blocks: PathBuf,
    pub lov_definitions: PathBuf,
    pub object_groups: PathBuf,
    /// Name of the application-properties stream (without extension)
    pub application: String,
}

impl Default for DefinitionsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            forms: PathBuf::from("forms"),
            blocks: PathBuf::from("blocks"),
            lov_definitions: PathBuf::from("lovs"),
            object_groups: PathBuf::from("objectgroups"),
            application: "application".to_string(),
        }
    }
}

/// Which names referenced by definitions must resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Renderer names against the application properties
    pub renderers: bool,
    /// Visual attribute names against the application properties
    pub visual_attributes: bool,
    /// Action processors and block services against the component registry
    pub action_processors: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            renderers: true,
            visual_attributes: true,
            action_processors: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Publish loaded forms to the loader's cache
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl LoaderConfig {
    /// Load configuration from TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read loader config from {}", path.as_ref().display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse TOML config from {}", path.as_ref().display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Invalid loader configuration")?;
        Ok(config)
    }

    /// Loads `formdef.toml` from `dir` when it exists, defaults otherwise
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Directory holding definitions of the given sub-directory setting
    pub fn resolve(&self, dir: &Path) -> PathBuf {
        self.definitions.root.join(dir)
    }
}
