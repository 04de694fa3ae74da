use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Expand tilde (~) in a path to the user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(rest) = path_str.strip_prefix("~/") {
            if let Some(home) = std::env::var_os("HOME") {
                return PathBuf::from(home).join(rest);
            }
        } else if path_str == "~" {
            if let Some(home) = std::env::var_os("HOME") {
                return PathBuf::from(home);
            }
        }
    }
    path.to_path_buf()
}

/// Configuration for the progress-tracker TUI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Directory holding the persisted video list and exam date
    pub data_dir: PathBuf,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("~/.local/share/vidpace"),
        }
    }
}

impl TuiConfig {
    /// Load configuration from a file, or return defaults if path is None or
    /// the file doesn't exist. TOML by extension, JSON otherwise.
    pub fn load_config(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(config_path) = path {
            if config_path.exists() {
                let content = std::fs::read_to_string(config_path).with_context(|| {
                    format!("Failed to read config file: {}", config_path.display())
                })?;

                if config_path.extension().and_then(|s| s.to_str()) == Some("toml") {
                    config = toml::from_str(&content).with_context(|| {
                        format!("Failed to parse TOML config: {}", config_path.display())
                    })?;
                } else {
                    config = serde_json::from_str(&content).with_context(|| {
                        format!("Failed to parse JSON config: {}", config_path.display())
                    })?;
                }
            }
        }

        config.data_dir = expand_tilde(&config.data_dir);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let config = TuiConfig::load_config(Some(Path::new("/no/such/file.toml"))).unwrap();
        assert!(config.data_dir.ends_with(".local/share/vidpace"));
    }

    #[test]
    fn tilde_expansion_uses_home() {
        std::env::set_var("HOME", "/home/tester");
        let expanded = expand_tilde(Path::new("~/data"));
        assert_eq!(expanded, PathBuf::from("/home/tester/data"));
    }
}
