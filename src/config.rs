/// Application configuration
///
/// Loaded once at startup from a JSON file in the user's config directory:
/// - Linux: ~/.config/photo-print/config.json
/// - macOS: ~/Library/Application Support/photo-print/config.json
/// - Windows: %APPDATA%\photo-print\config.json
///
/// The `PHOTO_PRINT_API_URL` environment variable overrides the backend
/// URL either way.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const API_URL_ENV: &str = "PHOTO_PRINT_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the photographies backend
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Optional decorative frame image overlaid on every printed cell
    #[serde(default)]
    pub frame_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: default_api_url(),
            frame_path: None,
        }
    }
}

impl Config {
    /// Load the configuration, falling back to defaults when the file is
    /// missing or unreadable. A broken config never prevents startup.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string(Self::path()) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    println!("📁 Config loaded from {}", Self::path().display());
                    config
                }
                Err(error) => {
                    eprintln!("⚠️  Invalid config, using defaults: {}", error);
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.api_url = url;
        }

        config
    }

    fn path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("photo-print");
        path.push("config.json");
        path
    }
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.frame_path, None);
    }

    #[test]
    fn test_full_config_round_trips() {
        let json = r#"{"api_url": "https://shop.example/api", "frame_path": "/tmp/frame.png"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.api_url, "https://shop.example/api");
        assert_eq!(config.frame_path, Some(PathBuf::from("/tmp/frame.png")));
    }
}
