use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IoResultExt, Result};
use crate::types::DocumentKind;

/// repository configuration stored in config.toml
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub document: DocumentConfig,
}

/// how tracked files map to parser families
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// extensions (without dot, case-insensitive) parsed as html; the rest is xml
    #[serde(default = "default_html_extensions")]
    pub html_extensions: Vec<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            html_extensions: default_html_extensions(),
        }
    }
}

fn default_html_extensions() -> Vec<String> {
    vec!["html".to_string(), "htm".to_string(), "xhtml".to_string()]
}

impl Config {
    /// load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_path(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_path(path)?;
        Ok(())
    }

    /// effective document kind for a file, an explicit override wins
    pub fn document_kind(&self, path: &Path, kind_override: Option<DocumentKind>) -> DocumentKind {
        kind_override
            .unwrap_or_else(|| DocumentKind::from_path(path, &self.document.html_extensions))
    }
}
