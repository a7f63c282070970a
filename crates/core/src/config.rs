use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How a new image directory is matched against registered root folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootMatch {
    /// The root folder with the longest path that prefixes the directory wins.
    #[default]
    LongestPrefix,
    /// The earliest registered root folder that prefixes the directory wins.
    FirstRegistered,
}

/// Options applied when a catalog is opened.
///
/// ```toml
/// read_only = false
/// root_match = "first-registered"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogOptions {
    pub read_only: bool,
    pub root_match: RootMatch,
}

impl CatalogOptions {
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
