use crate::dom::DomError;
#[cfg(not(target_arch = "wasm32"))]
use crate::dom::html::{ShadowBoundary, detached_element, set_attribute};
use crate::widget::WidgetConfig;
#[cfg(not(target_arch = "wasm32"))]
use kuchiki::NodeRef;
use thiserror::Error;

/// Bot id stamped on the preview launcher.
pub const LAUNCHER_BOT_ATTR: &str = "data-launcher-bot";
pub const LAUNCHER_API_URL_ATTR: &str = "data-launcher-api-url";

#[derive(Debug, Error)]
pub enum MountError {
    #[error("chat component failed to mount: {0}")]
    Component(String),
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// The conversational UI the loader mounts into an isolation boundary.
///
/// The loader treats it as opaque: it receives the full config untouched and is
/// responsible for every interpretation of it (including the default api origin).
pub trait ChatComponent<B> {
    type Handle;

    fn mount(&mut self, target: &B, config: &WidgetConfig) -> Result<Self::Handle, MountError>;

    /// Stop the component's effects. Called before its container leaves the document.
    fn unmount(&mut self, handle: Self::Handle);
}

/// Static launcher placeholder rendered into server-side previews.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct LauncherShell;

#[cfg(not(target_arch = "wasm32"))]
impl ChatComponent<ShadowBoundary> for LauncherShell {
    type Handle = NodeRef;

    fn mount(
        &mut self,
        target: &ShadowBoundary,
        config: &WidgetConfig,
    ) -> Result<NodeRef, MountError> {
        let launcher = detached_element(
            "<div class=\"chat-launcher\" part=\"launcher\"><button type=\"button\" aria-label=\"Open chat\"></button></div>",
            "div.chat-launcher",
        )?;
        set_attribute(&launcher, LAUNCHER_BOT_ATTR, &config.bot_id);
        if let Some(api_url) = &config.api_url {
            set_attribute(&launcher, LAUNCHER_API_URL_ATTR, api_url);
        }
        target.root().append(launcher.clone());
        Ok(launcher)
    }

    fn unmount(&mut self, handle: NodeRef) {
        handle.detach();
    }
}
