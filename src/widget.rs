use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the page-global handle exposing `init` / `destroy`.
pub const GLOBAL_NAME: &str = "ChatWidget";

/// Attribute that marks a `<script>` tag as the loader's declarative config source.
pub const MARKER_ATTR: &str = "data-chat-widget";
pub const BOT_ID_ATTR: &str = "data-bot-id";
pub const API_KEY_ATTR: &str = "data-api-key";
pub const API_URL_ATTR: &str = "data-api-url";

/// Id given to the container element appended to the host body.
pub const CONTAINER_ID: &str = "chat-widget-root";
/// Attribute on the container recording which bot the live instance talks to.
pub const CONTAINER_BOT_ATTR: &str = "data-chat-widget-bot";

/// Configuration handed to the loader by the host page.
///
/// The loader only checks the two required fields; everything else is passed
/// through untouched to the mounted chat component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(default)]
    pub bot_id: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Reserved. The loader always creates its own container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("botId is required")]
    MissingBotId,
    #[error("apiKey is required")]
    MissingApiKey,
}

impl WidgetConfig {
    pub fn new(bot_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            bot_id: bot_id.into(),
            api_key: api_key.into(),
            api_url: None,
            element_id: None,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_id.is_empty() {
            return Err(ConfigError::MissingBotId);
        }
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}
