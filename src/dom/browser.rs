//! Browser backend: a real shadow root per container, and the exports the
//! bootstrap script installs as the page-global `init` / `destroy` pair.
//!
//! Nothing exported here ever throws into the host page. Failures end up as
//! console warnings through the tracing subscriber installed at start.

use super::{DomError, HostDocument};
use crate::autoinit;
use crate::component::{ChatComponent, MountError};
use crate::loader::WidgetLoader;
use crate::widget::{CONTAINER_BOT_ATTR, WidgetConfig};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use tracing::{Level, Metadata, warn};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, ShadowRoot, ShadowRootInit, ShadowRootMode};

pub struct BrowserDocument {
    document: Document,
}

impl BrowserDocument {
    pub fn current() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }
}

fn js_error(err: JsValue) -> DomError {
    DomError::Operation(format!("{err:?}"))
}

impl HostDocument for BrowserDocument {
    type Container = Element;
    type Boundary = ShadowRoot;

    fn create_container(&self, id: &str, bot_id: &str) -> Result<Element, DomError> {
        let body = self.document.body().ok_or(DomError::MissingBody)?;
        let container = self.document.create_element("div").map_err(js_error)?;
        container.set_id(id);
        container
            .set_attribute(CONTAINER_BOT_ATTR, bot_id)
            .map_err(js_error)?;
        body.append_child(&container).map_err(js_error)?;
        Ok(container)
    }

    fn attach_boundary(&self, container: &Element) -> Result<ShadowRoot, DomError> {
        if container.shadow_root().is_some() {
            return Err(DomError::BoundaryExists);
        }
        container
            .attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))
            .map_err(|err| DomError::Unsupported(format!("{err:?}")))
    }

    fn inject_style(&self, boundary: &ShadowRoot, css: &str) -> Result<(), DomError> {
        let style = self.document.create_element("style").map_err(js_error)?;
        style.set_text_content(Some(css));
        boundary.append_child(&style).map_err(js_error)?;
        Ok(())
    }

    fn remove_container(&self, container: &Element) {
        if container.parent_node().is_some() {
            container.remove();
        }
    }

    fn marked_script(&self, marker: &str) -> Option<HashMap<String, String>> {
        let script = self
            .document
            .query_selector(&format!("script[{marker}]"))
            .ok()??;
        Some(
            script
                .get_attribute_names()
                .iter()
                .filter_map(|name| name.as_string())
                .filter_map(|name| script.get_attribute(&name).map(|value| (name, value)))
                .collect(),
        )
    }
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ChatWidgetUI, js_name = mount, catch)]
    fn mount_chat_ui(target: &ShadowRoot, config: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ChatWidgetUI, js_name = unmount, catch)]
    fn unmount_chat_ui(handle: &JsValue) -> Result<(), JsValue>;
}

/// Chat UI provided by the page as `ChatWidgetUI.mount(target, config)` /
/// `ChatWidgetUI.unmount(handle)`.
#[derive(Debug, Default)]
pub struct ExternalChatUi;

impl ChatComponent<ShadowRoot> for ExternalChatUi {
    type Handle = JsValue;

    fn mount(&mut self, target: &ShadowRoot, config: &WidgetConfig) -> Result<JsValue, MountError> {
        let config = config_to_js(config)
            .map_err(|err| MountError::Component(format!("{err:?}")))?;
        mount_chat_ui(target, &config).map_err(|err| MountError::Component(format!("{err:?}")))
    }

    fn unmount(&mut self, handle: JsValue) {
        if let Err(err) = unmount_chat_ui(&handle) {
            warn!(?err, "chat ui unmount failed");
        }
    }
}

fn config_to_js(config: &WidgetConfig) -> Result<JsValue, JsValue> {
    let object = js_sys::Object::new();
    let set = |key: &str, value: &str| {
        js_sys::Reflect::set(&object, &JsValue::from_str(key), &JsValue::from_str(value))
    };
    set("botId", &config.bot_id)?;
    set("apiKey", &config.api_key)?;
    if let Some(api_url) = &config.api_url {
        set("apiUrl", api_url)?;
    }
    if let Some(element_id) = &config.element_id {
        set("elementId", element_id)?;
    }
    Ok(object.into())
}

fn config_from_js(value: &JsValue) -> WidgetConfig {
    let field = |key: &str| {
        js_sys::Reflect::get(value, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_string())
    };
    WidgetConfig {
        bot_id: field("botId").unwrap_or_default(),
        api_key: field("apiKey").unwrap_or_default(),
        api_url: field("apiUrl"),
        element_id: field("elementId"),
    }
}

type BrowserLoader = WidgetLoader<BrowserDocument, ExternalChatUi>;

thread_local! {
    static LOADER: RefCell<Option<BrowserLoader>> = const { RefCell::new(None) };
}

fn with_loader(op: impl FnOnce(&mut BrowserLoader)) {
    LOADER.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            warn!("chat widget call ignored while another is in progress");
            return;
        };
        if slot.is_none() {
            let Some(document) = BrowserDocument::current() else {
                warn!("no document available; chat widget disabled");
                return;
            };
            *slot = Some(WidgetLoader::new(document, ExternalChatUi));
        }
        if let Some(loader) = slot.as_mut() {
            op(loader);
        }
    });
}

/// Exported as `initWidget`; the bootstrap exposes it as `ChatWidget.init`.
#[wasm_bindgen(js_name = initWidget)]
pub fn init(config: JsValue) {
    let config = config_from_js(&config);
    with_loader(|loader| {
        // rejected configs are already reported by the loader
        let _ = loader.init(config);
    });
}

/// Exported as `destroyWidget`; the bootstrap exposes it as `ChatWidget.destroy`.
#[wasm_bindgen(js_name = destroyWidget)]
pub fn destroy() {
    with_loader(|loader| loader.destroy());
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    init_console_tracing();
    schedule_auto_init();
}

fn schedule_auto_init() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if document.ready_state() != "loading" {
        run_auto_init();
        return;
    }
    let callback: Closure<dyn FnMut()> = Closure::once(run_auto_init);
    if let Err(err) = document
        .add_event_listener_with_callback("DOMContentLoaded", callback.as_ref().unchecked_ref())
    {
        warn!(?err, "failed to schedule chat widget auto-init");
        return;
    }
    callback.forget();
}

fn run_auto_init() {
    with_loader(|loader| {
        autoinit::run(loader);
    });
}

fn init_console_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(Level::INFO)
        .without_time()
        .with_ansi(false)
        .try_init();
}

struct ConsoleMakeWriter;

/// Buffers one formatted event and hands it to the console method matching its level.
struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buffer);
        let message = JsValue::from_str(line.trim_end());
        if self.level == Level::ERROR {
            web_sys::console::error_1(&message);
        } else if self.level == Level::WARN {
            web_sys::console::warn_1(&message);
        } else {
            web_sys::console::log_1(&message);
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> ConsoleWriter {
        ConsoleWriter {
            level: Level::INFO,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> ConsoleWriter {
        ConsoleWriter {
            level: *meta.level(),
            buffer: Vec::new(),
        }
    }
}
