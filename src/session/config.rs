//! Editor configuration injected into the session controller.
//!
//! # Example
//!
//! ```
//! use mro_editor::session::EditorConfig;
//!
//! let config = EditorConfig::from_toml_str(r#"mro_paths = ["/opt/pipelines/mro"]"#).unwrap();
//! assert_eq!(config.placeholder_name, "select file:");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};

/// Name shown in the main editor before any file is selected.
pub const DEFAULT_PLACEHOLDER_NAME: &str = "select file:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Directories new files can be created in. The first one is the initial choice.
    pub mro_paths: Vec<String>,

    #[serde(default = "default_placeholder_name")]
    pub placeholder_name: String,
}

fn default_placeholder_name() -> String {
    DEFAULT_PLACEHOLDER_NAME.to_string()
}

impl EditorConfig {
    pub fn new(mro_paths: Vec<String>) -> Self {
        EditorConfig {
            mro_paths,
            placeholder_name: default_placeholder_name(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: EditorConfig =
            toml::from_str(s).map_err(|e| EditorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mro_paths.is_empty() {
            return Err(EditorError::Config(
                "at least one mro path must be configured".to_string(),
            ));
        }
        if self.placeholder_name.is_empty() {
            return Err(EditorError::Config(
                "placeholder name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn initial_mro_path(&self) -> &str {
        self.mro_paths.first().map(String::as_str).unwrap_or_default()
    }

    pub fn knows_mro_path(&self, mro_path: &str) -> bool {
        self.mro_paths.iter().any(|p| p == mro_path)
    }
}
