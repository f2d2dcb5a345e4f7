use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// User-configurable preferences and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// User identifier stamped onto new sales when the surface has no
    /// session of its own.
    pub default_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for record collections.
    /// Defaults to `~/Documents/Carteira`.
    pub default_data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".into(),
            currency: "BRL".into(),
            default_user: None,
            default_data_root: None,
        }
    }
}

impl Config {
    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(path) = &self.default_data_root {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("Carteira")
    }
}
