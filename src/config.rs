//! Application configuration.
//!
//! Settings live in a `credentials.json` next to the binary's working
//! directory (device IP + chat API credentials). The file is optional: a
//! missing or malformed file yields the defaults, because a fresh checkout
//! must be able to run the offline commands without any setup.
//!
//! The loaded `AppConfig` is passed explicitly into the collaborators that
//! need it (device client, chat client, TUI); nothing in the pipeline reads
//! ambient global state, and the reports directory is always a parameter.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_CONFIG_PATH: &str = "credentials.json";
pub const DEFAULT_REPORTS_DIR: &str = "reportes";
pub const DEFAULT_DEVICE_IP: &str = "192.168.1.100";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_CHAT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat API settings (OpenAI-compatible endpoint).
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Missing key is a valid state: the chat command reports it as a
    /// configuration error, everything else works without it.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl ChatSettings {
    /// The API key, or a configuration error telling the user where to put it.
    pub fn require_api_key(&self) -> Result<&str, AppError> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::new(
                2,
                "No chat API key configured. Add it to credentials.json under \
                 openai.api_key or set the OPENAI_API_KEY environment variable.",
            )
        })
    }
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub device_ip: String,
    pub chat: ChatSettings,
}

/// On-disk shape of `credentials.json`. Every section and field is optional.
#[derive(Debug, Default, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    esp32: DeviceSection,
    #[serde(default)]
    openai: ChatSection,
}

#[derive(Debug, Default, Deserialize)]
struct DeviceSection {
    ip: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatSection {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
}

impl AppConfig {
    /// Load configuration from `path`, falling back to defaults for anything
    /// absent. `OPENAI_API_KEY` in the environment (or a `.env` file) fills in
    /// a missing file key.
    pub fn load(path: &Path) -> Self {
        let file: CredentialsFile = fs::read_to_string(path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();

        dotenvy::dotenv().ok();
        let api_key = file
            .openai
            .api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            // Placeholder keys from a freshly copied template don't count.
            .filter(|key| key.len() > 10);

        Self {
            device_ip: file
                .esp32
                .ip
                .filter(|ip| !ip.is_empty())
                .unwrap_or_else(|| DEFAULT_DEVICE_IP.to_string()),
            chat: ChatSettings {
                api_key,
                model: file
                    .openai
                    .model
                    .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
                base_url: file
                    .openai
                    .base_url
                    .unwrap_or_else(|| DEFAULT_CHAT_BASE_URL.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("credentials.json"));
        assert_eq!(config.device_ip, DEFAULT_DEVICE_IP);
        assert_eq!(config.chat.model, DEFAULT_CHAT_MODEL);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(
            &path,
            r#"{
                "esp32": {"ip": "10.0.0.42"},
                "openai": {"api_key": "sk-test-1234567890", "model": "gpt-4o"}
            }"#,
        )
        .unwrap();

        let config = AppConfig::load(&path);
        assert_eq!(config.device_ip, "10.0.0.42");
        assert_eq!(config.chat.model, "gpt-4o");
        assert_eq!(config.chat.api_key.as_deref(), Some("sk-test-1234567890"));
    }

    #[test]
    fn short_placeholder_keys_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, r#"{"openai": {"api_key": "changeme"}}"#).unwrap();

        let config = AppConfig::load(&path);
        assert!(config.chat.require_api_key().is_err());
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, b"{not json").unwrap();
        assert_eq!(AppConfig::load(&path).device_ip, DEFAULT_DEVICE_IP);
    }
}
