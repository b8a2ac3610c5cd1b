/*
[INPUT]:  YAML config file (optional) and OPENNEWS_* environment variables
[OUTPUT]: Validated runtime configuration
[POS]:    Config layer - file defaults overridden by the environment
[UPDATE]: When adding settings or environment variables
*/

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use opennews_adapter::tools::DEFAULT_MAX_ROWS;
use opennews_adapter::{
    ClientConfig, DEFAULT_API_BASE_URL, DEFAULT_WSS_URL, OpenNewsClient, TelegramClient,
    ToolContext,
};

/// Runtime configuration for the monitor binary.
///
/// Precedence is environment over file over built-in default. A missing API
/// token fails validation; everything else has a usable default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_wss_url")]
    pub wss_url: String,
    #[serde(default)]
    pub api_token: String,
    #[serde(default)]
    pub telegram: TelegramSettings,
    #[serde(default = "default_max_rows")]
    pub max_rows: u32,
    #[serde(default = "default_knowledge_dir")]
    pub knowledge_dir: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramSettings {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_wss_url() -> String {
    DEFAULT_WSS_URL.to_string()
}

fn default_max_rows() -> u32 {
    DEFAULT_MAX_ROWS
}

fn default_knowledge_dir() -> String {
    "knowledge".to_string()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            wss_url: default_wss_url(),
            api_token: String::new(),
            telegram: TelegramSettings::default(),
            max_rows: default_max_rows(),
            knowledge_dir: default_knowledge_dir(),
        }
    }
}

impl MonitorConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load from an optional file, then overlay the process environment
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Overlay environment variables; empty values are treated as unset.
    ///
    /// The lookup is injected so precedence is testable without touching the
    /// process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let overlay = |target: &mut String, name: &str| {
            if let Some(value) = lookup(name) {
                if !value.is_empty() {
                    *target = value;
                }
            }
        };
        overlay(&mut self.api_base_url, "OPENNEWS_API_BASE");
        overlay(&mut self.wss_url, "OPENNEWS_WSS_URL");
        overlay(&mut self.api_token, "OPENNEWS_TOKEN");
        overlay(&mut self.telegram.bot_token, "OPENNEWS_TELEGRAM_BOT_TOKEN");
        overlay(&mut self.telegram.chat_id, "OPENNEWS_TELEGRAM_CHAT_ID");

        if let Some(raw) = lookup("OPENNEWS_MAX_ROWS") {
            match raw.parse::<u32>() {
                Ok(rows) if rows > 0 => self.max_rows = rows,
                _ => {}
            }
        }
    }

    /// The API token is the only hard requirement
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_token.is_empty() {
            anyhow::bail!(
                "API token not configured; set OPENNEWS_TOKEN or api_token in the config file \
                 (request one at https://6551.io/mcp)"
            );
        }
        Ok(())
    }

    pub fn telegram_configured(&self) -> bool {
        !self.telegram.bot_token.is_empty() && !self.telegram.chat_id.is_empty()
    }

    /// Build the shared tool context for hosts embedding the tool surface
    pub fn tool_context(&self) -> anyhow::Result<ToolContext> {
        let api = OpenNewsClient::with_config_and_base_url(
            ClientConfig::default(),
            &self.api_base_url,
            &self.api_token,
        )
        .context("build api client")?;
        let telegram = if self.telegram_configured() {
            Some(
                TelegramClient::new(&self.telegram.bot_token, &self.telegram.chat_id)
                    .context("build telegram client")?,
            )
        } else {
            None
        };

        Ok(ToolContext {
            api,
            telegram,
            wss_url: self.wss_url.clone(),
            token: self.api_token.clone(),
            max_rows: self.max_rows,
            knowledge_dir: self.knowledge_dir.clone().into(),
        })
    }
}
