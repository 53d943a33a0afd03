//! Opportunistic bootstrap from the loader's own `<script>` tag:
//!
//! ```html
//! <script src="/widget/loader.js" data-chat-widget
//!         data-bot-id="..." data-api-key="..." data-api-url="..."></script>
//! ```
//!
//! Nothing here ever fails loudly. A missing tag or missing attribute simply
//! means no widget; `init` stays available to the host page either way.

use crate::component::ChatComponent;
use crate::dom::HostDocument;
use crate::loader::WidgetLoader;
use crate::widget::{API_KEY_ATTR, API_URL_ATTR, BOT_ID_ATTR, MARKER_ATTR, WidgetConfig};
use std::collections::HashMap;
use tracing::debug;

/// Assemble a config from script attributes. Required attributes must be present
/// and non-empty; an absent or empty api url stays unset.
pub fn config_from_attributes(attributes: &HashMap<String, String>) -> Option<WidgetConfig> {
    let non_empty = |name: &str| {
        attributes
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
    };
    Some(WidgetConfig {
        bot_id: non_empty(BOT_ID_ATTR)?,
        api_key: non_empty(API_KEY_ATTR)?,
        api_url: non_empty(API_URL_ATTR),
        element_id: None,
    })
}

/// Run auto-init against the loader's document. Returns whether a widget was mounted.
pub fn run<D, C>(loader: &mut WidgetLoader<D, C>) -> bool
where
    D: HostDocument,
    C: ChatComponent<D::Boundary>,
{
    let Some(attributes) = loader.document().marked_script(MARKER_ATTR) else {
        debug!("no marked loader script; skipping auto-init");
        return false;
    };
    let Some(config) = config_from_attributes(&attributes) else {
        debug!("loader script lacks bot id or api key; skipping auto-init");
        return false;
    };
    loader.init(config).is_ok()
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::component::{ChatComponent, MountError};
    use crate::dom::html::{HtmlDocument, ShadowBoundary};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct CountingChat {
        mounted: Rc<RefCell<Vec<WidgetConfig>>>,
    }

    impl ChatComponent<ShadowBoundary> for CountingChat {
        type Handle = ();

        fn mount(&mut self, _target: &ShadowBoundary, config: &WidgetConfig) -> Result<(), MountError> {
            self.mounted.borrow_mut().push(config.clone());
            Ok(())
        }

        fn unmount(&mut self, _handle: ()) {}
    }

    fn page(script: &str) -> String {
        format!("<html><head></head><body><main>app</main>{script}</body></html>")
    }

    fn run_on(html: &str) -> (bool, Vec<WidgetConfig>) {
        let chat = CountingChat::default();
        let mut loader = WidgetLoader::new(HtmlDocument::parse(html), chat.clone());
        let mounted = run(&mut loader);
        let configs = chat.mounted.borrow().clone();
        (mounted, configs)
    }

    #[test]
    fn skips_pages_without_marker() {
        let (mounted, configs) = run_on(&page(
            r#"<script src="/widget/loader.js" data-bot-id="b1" data-api-key="k1"></script>"#,
        ));
        assert!(!mounted);
        assert!(configs.is_empty());
    }

    #[test]
    fn initializes_once_from_marked_script() {
        let (mounted, configs) = run_on(&page(
            r#"<script src="/widget/loader.js" data-chat-widget data-bot-id="b1" data-api-key="k1" data-api-url="https://bots.example.com"></script>"#,
        ));
        assert!(mounted);
        assert_eq!(
            configs,
            vec![WidgetConfig::new("b1", "k1").with_api_url("https://bots.example.com")]
        );
    }

    #[test]
    fn absent_api_url_is_not_provided() {
        let (_, configs) = run_on(&page(
            r#"<script data-chat-widget data-bot-id="b1" data-api-key="k1"></script>"#,
        ));
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].api_url, None);
    }

    #[test]
    fn missing_required_attribute_does_nothing() {
        for script in [
            r#"<script data-chat-widget data-bot-id="b1"></script>"#,
            r#"<script data-chat-widget data-api-key="k1"></script>"#,
            r#"<script data-chat-widget data-bot-id="" data-api-key="k1"></script>"#,
        ] {
            let (mounted, configs) = run_on(&page(script));
            assert!(!mounted, "{script}");
            assert!(configs.is_empty(), "{script}");
        }
    }

    #[test]
    fn empty_api_url_maps_to_none() {
        let mut attrs = HashMap::new();
        attrs.insert(BOT_ID_ATTR.to_string(), "b1".to_string());
        attrs.insert(API_KEY_ATTR.to_string(), "k1".to_string());
        attrs.insert(API_URL_ATTR.to_string(), String::new());
        let cfg = config_from_attributes(&attrs).unwrap();
        assert_eq!(cfg.api_url, None);
    }
}
