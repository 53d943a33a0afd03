use crate::autoinit;
use crate::component::LauncherShell;
use crate::dom::html::HtmlDocument;
use crate::loader::{LoaderError, WidgetLoader};
use crate::widget::WidgetConfig;
use tracing::debug;

/// Render `host_html` with the widget mounted the way the loader would mount it
/// in a browser.
///
/// With an explicit config the widget is initialized from it; otherwise the page's
/// own marked loader script decides, and a page without one comes back unchanged
/// apart from serialization.
pub fn render_preview(host_html: &str, config: Option<WidgetConfig>) -> Result<String, LoaderError> {
    let document = HtmlDocument::parse(host_html);
    let mut loader = WidgetLoader::new(document.clone(), LauncherShell);
    match config {
        Some(config) => loader.init(config)?,
        None => {
            if !autoinit::run(&mut loader) {
                debug!("preview rendered without widget");
            }
        }
    }
    Ok(document.to_html())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::LAUNCHER_BOT_ATTR;
    use crate::widget::{CONTAINER_BOT_ATTR, CONTAINER_ID};

    const HOST: &str = "<html><head><title>shop</title></head><body><h1>Shop</h1></body></html>";

    #[test]
    fn explicit_config_adds_container_with_declarative_shadow_root() {
        let html = render_preview(HOST, Some(WidgetConfig::new("b1", "k1"))).unwrap();
        assert!(html.contains(&format!("id=\"{CONTAINER_ID}\"")));
        assert!(html.contains(&format!("{CONTAINER_BOT_ATTR}=\"b1\"")));
        assert!(html.contains("shadowrootmode=\"open\""));
        assert!(html.contains("<h1>Shop</h1>"));
    }

    #[test]
    fn shadow_root_carries_reset_stylesheet_and_launcher() {
        let html = render_preview(HOST, Some(WidgetConfig::new("b1", "k1"))).unwrap();
        let open = "<template shadowrootmode=\"open\">";
        let start = html.find(open).unwrap() + open.len();
        let end = start + html[start..].find("</template>").unwrap();
        let shadow = &html[start..end];

        assert!(shadow.starts_with("<style>"));
        assert!(shadow.contains("box-sizing: border-box"));
        assert!(shadow.contains("class=\"chat-launcher\""));
        assert!(!html[..start].contains("chat-launcher"));
    }

    #[test]
    fn host_selectors_miss_widget_after_reparse() {
        let host = r#"<html><head><style>.chat-launcher { display: none }</style></head>
<body><nav class="chat-launcher">host nav</nav></body></html>"#;
        let html = render_preview(host, Some(WidgetConfig::new("b1", "k1"))).unwrap();

        let reparsed = HtmlDocument::parse(&html);
        let hits: Vec<_> = reparsed.root().select(".chat-launcher").unwrap().collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].as_node().text_contents(), "host nav");
        assert_eq!(reparsed.root().select("style").unwrap().count(), 1);
    }

    #[test]
    fn falls_back_to_marked_script() {
        let host = "<html><body><script data-chat-widget data-bot-id=\"b7\" data-api-key=\"k7\"></script></body></html>";
        let html = render_preview(host, None).unwrap();
        assert!(html.contains(&format!("{CONTAINER_BOT_ATTR}=\"b7\"")));
        assert!(html.contains(&format!("{LAUNCHER_BOT_ATTR}=\"b7\"")));
    }

    #[test]
    fn plain_page_stays_widget_free() {
        let html = render_preview(HOST, None).unwrap();
        assert!(!html.contains(CONTAINER_ID));
    }

    #[test]
    fn invalid_config_is_reported() {
        let err = render_preview(HOST, Some(WidgetConfig::new("", "k1"))).unwrap_err();
        assert!(matches!(err, LoaderError::Config(_)));
    }
}
