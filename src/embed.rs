use crate::widget::{
    API_KEY_ATTR, API_URL_ATTR, BOT_ID_ATTR, ConfigError, GLOBAL_NAME, MARKER_ATTR, WidgetConfig,
};
use serde::Serialize;

/// Embed code a host page pastes to load the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedSnippet {
    /// Loader script followed by an explicit `init` call.
    pub programmatic: String,
    /// Single loader script tag configured through data attributes (auto-init).
    pub declarative: String,
}

impl EmbedSnippet {
    pub fn for_config(loader_src: &str, config: &WidgetConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            programmatic: programmatic(loader_src, config),
            declarative: declarative(loader_src, config),
        })
    }
}

fn programmatic(loader_src: &str, config: &WidgetConfig) -> String {
    let init = WidgetConfig {
        element_id: None,
        ..config.clone()
    };
    // `</` inside an inline script would end it early
    let json = serde_json::to_string(&init)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");
    format!(
        "<script src=\"{src}\"></script>\n<script>\n  {GLOBAL_NAME}.init({json});\n</script>",
        src = escape_attr(loader_src),
    )
}

fn declarative(loader_src: &str, config: &WidgetConfig) -> String {
    let mut tag = format!(
        "<script src=\"{}\" {MARKER_ATTR} {BOT_ID_ATTR}=\"{}\" {API_KEY_ATTR}=\"{}\"",
        escape_attr(loader_src),
        escape_attr(&config.bot_id),
        escape_attr(&config.api_key),
    );
    if let Some(api_url) = &config.api_url {
        tag.push_str(&format!(" {API_URL_ATTR}=\"{}\"", escape_attr(api_url)));
    }
    tag.push_str("></script>");
    tag
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
